pub const TITLE: &str = "GitHub Explorer";
pub const PROMPT: &str = "Enter GitHub username";
pub const CARD_WIDTH: usize = 48;

pub const CMD_NEW: &str = ":new";
pub const CMD_OPEN: &str = ":open";
pub const CMD_HELP: &str = ":help";
pub const CMD_QUIT: &str = ":quit";

pub const HELP: &str = "\
Type a GitHub username and press Enter.
  :new    new search
  :open   view the loaded profile on GitHub
  :help   show this help
  :quit   exit";
