//! Terminal front-end for the support chat widget.

use anyhow::Result;
use shared::domain::{ChatMessage, MessageRole};
use support_client::{ActionTarget, ChatWidget, SupportTransport};
use tokio::io::{self, AsyncBufReadExt, BufReader};

const HELP: &str = "номер — выбрать действие, o — открыть/свернуть, esc — свернуть, q — выход";

fn render_message(message: &ChatMessage) -> String {
    let who = match message.role {
        MessageRole::Bot => "поддержка",
        MessageRole::User => "вы",
    };
    match &message.link {
        Some(link) => format!("{who}: {} {} <{}>", message.text, link.label, link.href),
        None => format!("{who}: {}", message.text),
    }
}

struct Screen {
    shown: usize,
}

impl Screen {
    fn render(&mut self, widget: &mut ChatWidget) {
        if !widget.is_open() {
            println!("[чат свёрнут]");
            return;
        }

        let messages = widget.messages();
        if self.shown > messages.len() {
            self.shown = 0;
        }
        for message in &messages[self.shown..] {
            println!("{}", render_message(message));
        }
        self.shown = messages.len();

        for (index, view) in widget.actions().iter().enumerate() {
            let marker = if view.disabled { " (недоступно)" } else { "" };
            println!("  [{}] {}{marker}", index + 1, view.item.label);
        }
        widget.take_scroll_request();
    }
}

pub async fn run<T>(transport: &T) -> Result<()>
where
    T: SupportTransport + ?Sized,
{
    let mut widget = ChatWidget::new();
    let mut screen = Screen { shown: 0 };
    let mut lines = BufReader::new(io::stdin()).lines();

    println!("{HELP}");
    widget.open();
    screen.render(&mut widget);

    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "q" => break,
            "o" => widget.toggle(),
            "esc" => {
                widget.handle_escape();
            }
            input => {
                let Ok(choice) = input.parse::<usize>() else {
                    println!("{HELP}");
                    continue;
                };
                let Some(view) = choice
                    .checked_sub(1)
                    .and_then(|index| widget.actions().get(index).copied())
                else {
                    println!("нет такого действия");
                    continue;
                };

                match view.item.target {
                    ActionTarget::Link { href } => println!("-> {href}"),
                    ActionTarget::Button(action) => {
                        if let Err(error) = widget.run(action, transport).await {
                            println!("{error}");
                        }
                    }
                }
            }
        }
        screen.render(&mut widget);
    }

    Ok(())
}
