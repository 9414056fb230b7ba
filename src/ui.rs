use anstyle::{AnsiColor, Style};
use is_terminal::IsTerminal;
use std::fmt::Display;
use std::io::{self, Write};
use std::time::{Duration, Instant};

const LABEL_WIDTH: usize = 12;

#[derive(Debug, Clone, Copy)]
enum Tone {
    Pending,
    Success,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy)]
enum Output {
    Stdout,
    Stderr,
}

impl Tone {
    fn style(self) -> Style {
        let color = match self {
            Tone::Pending => AnsiColor::Cyan,
            Tone::Success => AnsiColor::Green,
            Tone::Info => AnsiColor::Blue,
            Tone::Warn => AnsiColor::Yellow,
            Tone::Error => AnsiColor::Red,
        };
        Style::new().bold().fg_color(Some(color.into()))
    }

    fn output(self) -> Output {
        match self {
            Tone::Warn | Tone::Error => Output::Stderr,
            _ => Output::Stdout,
        }
    }
}

fn use_color(output: Output) -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    match output {
        Output::Stdout => io::stdout().is_terminal(),
        Output::Stderr => io::stderr().is_terminal(),
    }
}

fn render(tone: Tone, label: &str, message: &str, color: bool) -> String {
    let label = format!("{label:>LABEL_WIDTH$}");
    let label = if color {
        let style = tone.style();
        format!("{}{label}{}", style.render(), style.render_reset())
    } else {
        label
    };

    let mut out = String::new();
    for (idx, line) in message.lines().enumerate() {
        if idx == 0 {
            out.push_str(&format!("{label} {line}\n"));
        } else {
            out.push_str(&format!("{:LABEL_WIDTH$} {line}\n", ""));
        }
    }
    if out.is_empty() {
        out = format!("{label}\n");
    }
    out
}

fn emit(tone: Tone, label: &str, message: &str) {
    let output = tone.output();
    let text = render(tone, label, message, use_color(output));
    let _ = match output {
        Output::Stdout => io::stdout().lock().write_all(text.as_bytes()),
        Output::Stderr => io::stderr().lock().write_all(text.as_bytes()),
    };
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        match secs % 60 {
            0 => format!("{}m", secs / 60),
            rest => format!("{}m {rest}s", secs / 60),
        }
    } else if duration.as_secs_f64() >= 1.0 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{}ms", duration.as_millis())
    }
}

pub fn status(label: &str, message: impl Display) {
    emit(Tone::Pending, label, &message.to_string());
}

pub fn info(message: impl Display) {
    emit(Tone::Info, "Info", &message.to_string());
}

pub fn warn(message: impl Display) {
    emit(Tone::Warn, "Warning", &message.to_string());
}

pub fn error(message: impl Display) {
    emit(Tone::Error, "Error", &message.to_string());
}

pub fn success(label: &str, message: impl Display) {
    emit(Tone::Success, label, &message.to_string());
}

/// A timed step: prints a pending line now and an outcome line when resolved.
pub struct Progress {
    message: String,
    started: Instant,
    complete: bool,
}

impl Progress {
    pub fn new(label: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        emit(Tone::Pending, label, &message);
        Self {
            message,
            started: Instant::now(),
            complete: false,
        }
    }

    pub fn success(mut self, label: &str) {
        self.complete = true;
        let elapsed = format_duration(self.started.elapsed());
        emit(Tone::Success, label, &format!("{} in {elapsed}", self.message));
    }

    pub fn fail(mut self, label: &str, error: impl Display) {
        self.complete = true;
        let elapsed = format_duration(self.started.elapsed());
        emit(
            Tone::Error,
            label,
            &format!("{} after {elapsed}: {error}", self.message),
        );
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        if !self.complete {
            emit(Tone::Warn, "Aborted", &self.message);
        }
    }
}
