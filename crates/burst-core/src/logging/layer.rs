//! Custom tracing layer for JSONL output.
//!
//! Produces one JSON object per event on stderr, keeping stdout clean
//! for the segment report.

use std::io::{self, Write};
use std::sync::Mutex;

use chrono::Utc;
use tracing::span::{Attributes, Id};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use super::events::Level;

/// Correlation fields recorded on a span.
#[derive(Debug, Clone, Default)]
struct SpanContext {
    run_id: Option<String>,
    stage: Option<String>,
}

/// Collects event fields into a JSON map.
struct JsonFieldVisitor {
    fields: serde_json::Map<String, serde_json::Value>,
    message: Option<String>,
    run_id: Option<String>,
    stage: Option<String>,
}

impl JsonFieldVisitor {
    fn new() -> Self {
        JsonFieldVisitor {
            fields: serde_json::Map::new(),
            message: None,
            run_id: None,
            stage: None,
        }
    }

    fn record_string(&mut self, name: &str, value: String) {
        match name {
            "message" => self.message = Some(value),
            "run_id" => self.run_id = Some(value),
            "stage" => self.stage = Some(value),
            _ => {
                self.fields
                    .insert(name.to_string(), serde_json::Value::String(value));
            }
        }
    }
}

impl tracing::field::Visit for JsonFieldVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.record_string(field.name(), value.to_string());
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.record_string(field.name(), format!("{:?}", value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.fields.insert(
            field.name().to_string(),
            serde_json::Value::Number(value.into()),
        );
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields.insert(
            field.name().to_string(),
            serde_json::Value::Number(value.into()),
        );
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        // Infinite lattice costs have no JSON number form.
        let json = serde_json::Number::from_f64(value)
            .map(serde_json::Value::Number)
            .unwrap_or_else(|| serde_json::Value::String(value.to_string()));
        self.fields.insert(field.name().to_string(), json);
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.fields
            .insert(field.name().to_string(), serde_json::Value::Bool(value));
    }
}

struct SpanContextVisitor {
    context: SpanContext,
}

impl tracing::field::Visit for SpanContextVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        match field.name() {
            "run_id" => self.context.run_id = Some(value.to_string()),
            "stage" => self.context.stage = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "run_id" => self.context.run_id = Some(format!("{:?}", value)),
            "stage" => self.context.stage = Some(format!("{:?}", value)),
            _ => {}
        }
    }
}

/// JSONL tracing layer.
pub struct JsonlLayer<W = io::Stderr> {
    writer: Mutex<W>,
}

impl JsonlLayer<io::Stderr> {
    /// Create a new JSONL layer writing to stderr.
    pub fn stderr() -> Self {
        JsonlLayer {
            writer: Mutex::new(io::stderr()),
        }
    }
}

impl<W: Write> JsonlLayer<W> {
    /// Create a new JSONL layer with a custom writer.
    pub fn new(writer: W) -> Self {
        JsonlLayer {
            writer: Mutex::new(writer),
        }
    }
}

impl<S, W> Layer<S> for JsonlLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: Write + 'static,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut visitor = SpanContextVisitor {
            context: SpanContext::default(),
        };
        attrs.record(&mut visitor);

        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(visitor.context);
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let ts = Utc::now();

        let mut visitor = JsonFieldVisitor::new();
        event.record(&mut visitor);

        // Event fields win; otherwise inherit from the innermost span that has them
        let mut run_id = visitor.run_id.take();
        let mut stage = visitor.stage.take();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope {
                if let Some(span_ctx) = span.extensions().get::<SpanContext>() {
                    if run_id.is_none() {
                        run_id.clone_from(&span_ctx.run_id);
                    }
                    if stage.is_none() {
                        stage.clone_from(&span_ctx.stage);
                    }
                }
            }
        }

        let level: Level = (*event.metadata().level()).into();
        let mut obj = serde_json::Map::new();

        obj.insert("ts".to_string(), serde_json::json!(ts.to_rfc3339()));
        obj.insert("level".to_string(), serde_json::json!(level));
        obj.insert(
            "event".to_string(),
            serde_json::json!(event.metadata().target()),
        );
        if let Some(id) = run_id {
            obj.insert("run_id".to_string(), serde_json::json!(id));
        }
        if let Some(s) = stage {
            obj.insert("stage".to_string(), serde_json::json!(s));
        }
        if let Some(msg) = visitor.message {
            obj.insert("message".to_string(), serde_json::json!(msg));
        }
        if !visitor.fields.is_empty() {
            obj.insert(
                "fields".to_string(),
                serde_json::Value::Object(visitor.fields),
            );
        }

        let json = serde_json::to_string(&serde_json::Value::Object(obj)).unwrap_or_default();
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", json);
        }
    }
}
