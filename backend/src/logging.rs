use tracing::{Event, Subscriber};
use tracing_subscriber::{layer::Context, Layer, EnvFilter, Registry};
use tracing_subscriber::prelude::*;

const DEFAULT_FILTER: &str = "warn,backend=info";

// Chatty client libraries; their events never reach the console.
const SILENCED_TARGETS: [&str; 4] = ["hyper", "reqwest", "redis", "h2"];

#[derive(Default)]
struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0.push_str(&format!("{:?}", value));
        } else {
            self.0.push_str(&format!(" {}={:?}", field.name(), value));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.0.push_str(value);
        } else {
            self.0.push_str(&format!(" {}={}", field.name(), value));
        }
    }
}

struct ConsoleLayer;

fn is_silenced(target: &str) -> bool {
    SILENCED_TARGETS.iter().any(|prefix| target.starts_with(prefix))
}

fn format_line(level: &tracing::Level, target: &str, message: &str) -> Option<String> {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    match *level {
        tracing::Level::ERROR => Some(format!("[{}] ❌ Error: {} - {}", timestamp, target, message)),
        tracing::Level::WARN => Some(format!("[{}] ⚠️ Warning: {} - {}", timestamp, target, message)),
        tracing::Level::INFO => Some(format!("[{}] ℹ️ {} - {}", timestamp, target, message)),
        tracing::Level::DEBUG => Some(format!("[{}] 🔄 {} - {}", timestamp, target, message)),
        _ => None,
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        if is_silenced(metadata.target()) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        if visitor.0.is_empty() {
            return;
        }

        if let Some(line) = format_line(metadata.level(), metadata.target(), &visitor.0) {
            println!("{}", line);
        }
    }
}

pub fn setup() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = Registry::default()
        .with(env_filter)
        .with(ConsoleLayer);

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber was already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_library_targets_are_silenced() {
        assert!(is_silenced("hyper::proto::h1"));
        assert!(is_silenced("reqwest::connect"));
        assert!(!is_silenced("backend::roulette::verify_order"));
    }

    #[test]
    fn test_trace_level_is_not_printed() {
        assert!(format_line(&tracing::Level::TRACE, "backend", "noise").is_none());
        let line = format_line(&tracing::Level::ERROR, "backend", "boom").unwrap();
        assert!(line.ends_with("Error: backend - boom"));
    }
}
