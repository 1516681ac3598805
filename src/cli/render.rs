//! `parley render`: run the markdown engine offline on a file or stdin.

use std::error::Error;
use std::io::Read;
use std::path::Path;

use crate::cli::chat::print_lines;
use crate::cli::{pick_theme, Args};
use crate::core::config::Config;
use crate::ui::markdown::{parse, render_html, render_lines};

pub fn run_render(file: Option<&Path>, html: bool, args: &Args) -> Result<(), Box<dyn Error>> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|err| format!("Cannot read {}: {err}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let doc = parse(&text);
    if html {
        println!("{}", render_html(&doc));
        return Ok(());
    }

    // A broken settings file should not stop offline rendering.
    let config = Config::load().unwrap_or_default();
    let (theme, color) = pick_theme(args, &config);
    print_lines(&render_lines(&doc, &theme), color)?;
    Ok(())
}
