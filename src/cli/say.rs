//! One-shot "say" command: send a single message and print the reply.

use std::error::Error;

use crate::cli::chat::print_lines;
use crate::cli::Context;
use crate::core::chat::send_message;
use crate::ui::transcript::{message_html, message_lines};

pub async fn run_say(ctx: &Context, prompt: &str, html: bool) -> Result<(), Box<dyn Error>> {
    let backend = ctx.backend();
    let (mut state, _status) = ctx.connect(&backend).await;
    send_message(&mut state, &backend, prompt, ctx.timeout).await?;

    let Some(reply) = state.messages().last() else {
        return Ok(());
    };
    if html {
        println!("{}", message_html(reply, ctx.options));
    } else {
        print_lines(&message_lines(reply, &ctx.theme, ctx.options), ctx.color)?;
    }

    if reply.is_error {
        std::process::exit(1);
    }
    Ok(())
}
