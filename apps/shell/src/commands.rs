//! Command handlers. Each returns the text (or JSON) to print on stdout.

use crate::args::{Command, UpdateOp};
use anyhow::{Context, Result};
use bitf::kernel::RecordSchema;
use bitf::query::{Dialect, Fragment, QueryPredicateBuilder};
use bitf::{Bit, BitHandler};
use serde_json::json;
use std::fmt::Write;
use tracing::debug;

pub fn run(schema: &RecordSchema, command: Command, json: bool) -> Result<String> {
    debug!(?command, "Running command");

    match command {
        Command::Fields {} => fields(schema, json),
        Command::Decode { field, value } => decode(schema, &field, value, json),
        Command::Encode { field, flags } => encode(schema, &field, &flags, json),
        Command::Filter { field, flag, clear, table, dialect } => {
            let bit = flag_of(schema, &field, &flag)?;
            let fragment = builder(&field, table, dialect).matches(if clear { !bit } else { bit });
            render_fragment(&fragment, json)
        },
        Command::Update { field, flag, op, table, dialect } => {
            let bit = flag_of(schema, &field, &flag)?;
            let builder = builder(&field, table, dialect);
            let fragment = match op {
                UpdateOp::Set => builder.set_update(bit),
                UpdateOp::Clear => builder.clear_update(bit),
                UpdateOp::Toggle => builder.toggle_update(bit)?,
            };
            render_fragment(&fragment, json)
        },
        Command::Choices { field } => choices(schema, &field, json),
    }
}

fn fields(schema: &RecordSchema, json: bool) -> Result<String> {
    if json {
        let fields: serde_json::Map<_, _> = schema
            .fields()
            .map(|(name, spec)| {
                let flags: Vec<&str> = spec.registry().names().collect();
                (name.to_owned(), json!({ "flags": flags, "default": spec.default_value() }))
            })
            .collect();
        let composites: serde_json::Map<_, _> = schema
            .composites()
            .map(|composite| (composite.name().to_owned(), json!(composite.members())))
            .collect();
        return Ok(json!({ "fields": fields, "composites": composites }).to_string());
    }

    let mut out = String::new();
    for (name, spec) in schema.fields() {
        writeln!(out, "{name}\t{} flags\tdefault {}", spec.registry().len(), spec.default_value())?;
    }
    for composite in schema.composites() {
        writeln!(out, "{}\tcomposite of {}", composite.name(), composite.members().join(", "))?;
    }
    Ok(out.trim_end().to_owned())
}

fn decode(schema: &RecordSchema, field: &str, value: i64, json: bool) -> Result<String> {
    let handler = schema.field(field)?.load(Some(value));

    if json {
        let enabled: Vec<&str> = handler.enabled().collect();
        return Ok(json!({ "field": field, "value": handler.value(), "enabled": enabled }).to_string());
    }

    let mut out = format!("value\t{}", handler.value());
    for (name, on) in handler.iter().filter(|(name, _)| !name.is_empty()) {
        write!(out, "\n{name}\t{}", if on { "on" } else { "off" })?;
    }
    Ok(out)
}

fn encode(schema: &RecordSchema, field: &str, flags: &[String], json: bool) -> Result<String> {
    let registry = schema.field(field)?.registry().clone();
    let handler = BitHandler::from_names(flags, registry)
        .with_context(|| format!("Encoding flags of field `{field}`"))?;

    Ok(if json {
        json!({ "field": field, "value": handler.value() }).to_string()
    } else {
        handler.to_string()
    })
}

fn choices(schema: &RecordSchema, field: &str, json: bool) -> Result<String> {
    let spec = schema.field(field)?;
    let choices: Vec<(&str, &str)> = spec.registry().choices().collect();

    if json {
        return Ok(serde_json::to_string(&choices)?);
    }
    Ok(choices.iter().map(|(name, label)| format!("{name}\t{label}")).collect::<Vec<_>>().join("\n"))
}

fn flag_of(schema: &RecordSchema, field: &str, flag: &str) -> Result<Bit> {
    let bit = schema
        .field(field)?
        .registry()
        .bit(flag)
        .with_context(|| format!("Resolving flag of field `{field}`"))?;
    Ok(bit)
}

fn builder(field: &str, table: Option<String>, dialect: Dialect) -> QueryPredicateBuilder {
    let builder = QueryPredicateBuilder::new(field).with_dialect(dialect);
    match table {
        Some(alias) => builder.with_table(alias),
        None => builder,
    }
}

fn render_fragment(fragment: &Fragment, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string(fragment)?);
    }
    Ok(fragment.inline())
}
