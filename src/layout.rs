use crate::event::LogEvent;
use std::fmt::Write as _;
use std::str::FromStr;

/// Template turning an event into a display string.
///
/// Supported placeholders: `${message}`, `${level}`, `${logger}`,
/// `${longdate}` and `${exception}`. Everything else is copied literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Message,
    Level,
    Logger,
    LongDate,
    Exception,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("unknown layout renderer `${{{0}}}`")]
    UnknownRenderer(String),

    #[error("unterminated `${{` in layout")]
    Unterminated,
}

impl Layout {
    pub fn parse(template: &str) -> Result<Self, LayoutError> {
        let mut segments = Vec::new();
        let mut rest = template;

        while let Some(start) = rest.find("${") {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            let after = &rest[start + 2..];
            let end = after.find('}').ok_or(LayoutError::Unterminated)?;
            let name = after[..end].trim();
            let segment = match name.to_ascii_lowercase().as_str() {
                "message" => Segment::Message,
                "level" => Segment::Level,
                "logger" => Segment::Logger,
                "longdate" => Segment::LongDate,
                "exception" => Segment::Exception,
                _ => return Err(LayoutError::UnknownRenderer(name.to_string())),
            };
            segments.push(segment);
            rest = &after[end + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Layout { segments })
    }

    pub fn render(&self, event: &LogEvent) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Message => out.push_str(&event.message),
                Segment::Level => out.push_str(event.level.as_str()),
                Segment::Logger => out.push_str(&event.logger),
                Segment::LongDate => {
                    let _ = write!(out, "{}", event.timestamp.format("%Y-%m-%d %H:%M:%S%.4f"));
                }
                Segment::Exception => {
                    if let Some(failure) = &event.failure {
                        out.push_str(&failure.message);
                    }
                }
            }
        }
        out
    }
}

impl Default for Layout {
    /// Just the formatted message.
    fn default() -> Self {
        Layout {
            segments: vec![Segment::Message],
        }
    }
}

impl FromStr for Layout {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layout::parse(s)
    }
}
