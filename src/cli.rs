use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "lazyform", version, about = "Applicant contact form in a terminal modal")]
pub struct Args {
    /// Key under which scroll position and last focused field are remembered
    #[arg(short, long)]
    pub storage_key: Option<String>,

    /// Do not restore scroll position or focus between opens
    #[arg(long)]
    pub no_restore: bool,

    /// Theme name (e.g., "Catppuccin Latte")
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Open the form right away
    #[arg(short, long)]
    pub open: bool,
}
