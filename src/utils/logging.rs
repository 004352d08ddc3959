//! Plain-text transcript logging (`--log FILE` and `/log`).

use crate::core::content::{parse_blocks, ContentBlock};
use crate::core::message::{Message, Product, SocialPost};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub struct LoggingState {
    file_path: Option<String>,
    is_active: bool,
}

impl LoggingState {
    pub fn new(log_file: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut logging = LoggingState {
            file_path: None,
            is_active: false,
        };

        if let Some(path) = log_file {
            logging.set_log_file(path)?;
        }

        Ok(logging)
    }

    pub fn set_log_file(&mut self, path: String) -> Result<String, Box<dyn std::error::Error>> {
        test_file_access(&path)?;

        self.file_path = Some(path.clone());
        self.is_active = true;

        Ok(format!("Logging enabled to: {path}"))
    }

    pub fn toggle_logging(&mut self) -> Result<String, Box<dyn std::error::Error>> {
        match &self.file_path {
            Some(path) => {
                if self.is_active {
                    self.write_to_log("## Logging paused")?;
                    self.is_active = false;
                    Ok(format!("Logging paused (file: {path})"))
                } else {
                    self.is_active = true;
                    Ok(format!("Logging resumed to: {path}"))
                }
            }
            None => {
                Err("No log file specified. Use /log <filename> to enable logging first.".into())
            }
        }
    }

    pub fn log_message(&self, message: &Message) -> Result<(), Box<dyn std::error::Error>> {
        if !self.is_active || self.file_path.is_none() {
            return Ok(());
        }

        self.write_to_log(&format_transcript_entry(message))
    }

    fn write_to_log(&self, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        let Some(file_path) = self.file_path.as_ref() else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }
        writeln!(writer)?;

        writer.flush()?;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn get_status_string(&self) -> String {
        let file_name = |path: &str| {
            Path::new(path)
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned()
        };
        match (&self.file_path, self.is_active) {
            (None, _) => "off".to_string(),
            (Some(path), true) => format!("on ({})", file_name(path)),
            (Some(path), false) => format!("paused ({})", file_name(path)),
        }
    }
}

/// Write the whole conversation to `path`, replacing any existing file only
/// once the new contents are complete.
pub fn dump_conversation(
    messages: &[Message],
    path: &Path,
) -> Result<usize, Box<dyn std::error::Error>> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut temp_file = NamedTempFile::new_in(parent)?;

    for message in messages {
        for line in format_transcript_entry(message).lines() {
            writeln!(temp_file, "{line}")?;
        }
        writeln!(temp_file)?;
    }

    temp_file.flush()?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path)?;
    Ok(messages.len())
}

/// Render one message as plain text, expanding every attached card.
pub fn format_transcript_entry(message: &Message) -> String {
    let mut out = Vec::new();

    if message.is_user() {
        out.push(format!("You: {}", message.content));
        if !message.images.is_empty() {
            out.push(format!("  [{} image(s) attached]", message.images.len()));
        }
        out.extend(message.products.iter().map(product_line));
        return out.join("\n");
    }

    let blocks = parse_blocks(&message.content)
        .unwrap_or_else(|_| vec![ContentBlock::Text(message.content.clone())]);
    let mut products_written = false;
    let mut posts_written = false;

    for block in blocks {
        match block {
            ContentBlock::Text(text) => out.push(text),
            ContentBlock::Products => {
                out.extend(message.products.iter().map(product_line));
                products_written = true;
            }
            ContentBlock::Posts => {
                out.extend(message.posts.iter().map(post_line));
                posts_written = true;
            }
        }
    }
    if !products_written {
        out.extend(message.products.iter().map(product_line));
    }
    if !posts_written {
        out.extend(message.posts.iter().map(post_line));
    }
    if !message.styles.is_empty() {
        out.push(format!("Styles: {}", message.styles.join(", ")));
    }

    out.join("\n")
}

fn product_line(product: &Product) -> String {
    let mut line = format!("  • {} ({}) from {}", product.name, product.price, product.shop);
    if let Some(link) = &product.link {
        line.push_str(&format!(" <{link}>"));
    }
    line
}

fn post_line(post: &SocialPost) -> String {
    format!("  @{}: {} <{}>", post.username, post.caption, post.link)
}

fn test_file_access(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.flush()?;
    Ok(())
}
