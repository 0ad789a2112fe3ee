pub const HELP_TEXT: &str = "\
Commands:
  folder <path>       choose the folder to convert
  drop <path>         same as dragging a folder in; pasting a bare path works too
  name <base>         output file name without extension
  format pdf|txt|csv  output format
  theme               toggle dark/light colours
  convert             run the conversion
  status              show the current settings
  help                show this text
  quit                leave the shell";

pub const BANNER: &str = "folio: concatenate a folder into one PDF, TXT or CSV file. Type 'help' for commands.";

pub const BAR_TICK_MS: u64 = 100;
