//! HTML rendering of resumes and cover letters.
//!
//! Templates are Tera sources embedded at compile time. Helper functions are
//! not registered globally: a [`Helpers`] table is built for the active locale
//! and installed into the fresh `Tera` instance of each render call.

use std::collections::HashMap;

use anyhow::Context as _;
use serde::Serialize;
use tera::{Context, Tera, Value};

use crate::format::{format_date, format_location, no_schema_url, DateStyle};
use crate::i18n::Locale;
use crate::icons;
use crate::markdown::inline_html;
use crate::minify::minify_html;
use crate::normalize::{entry_date_range, LetterView, ResumeView};

pub const STYLE_CSS: &str = include_str!("../assets/style.css");
const RESUME_TEMPLATE: &str = include_str!("../assets/resume.html.tera");
const LETTER_TEMPLATE: &str = include_str!("../assets/cover-letter.html.tera");

pub type FilterFn = fn(&Value, &HashMap<String, Value>, Locale) -> tera::Result<Value>;
pub type FunctionFn = fn(&HashMap<String, Value>, Locale) -> tera::Result<Value>;

/// Named helpers available to the templates, bound to one locale.
#[derive(Clone)]
pub struct Helpers {
    locale: Locale,
    filters: Vec<(&'static str, FilterFn)>,
    functions: Vec<(&'static str, FunctionFn)>,
}

impl Helpers {
    pub fn standard(locale: Locale) -> Self {
        Self {
            locale,
            filters: vec![
                ("date_range", date_range_filter),
                ("date", date_filter),
                ("markdown", markdown_filter),
                ("no_schema_url", no_schema_url_filter),
                ("format_location", format_location_filter),
                ("join_or_empty", join_or_empty_filter),
            ],
            functions: vec![("icon", icon_function), ("t", label_function)],
        }
    }

    pub fn with_filter(mut self, name: &'static str, f: FilterFn) -> Self {
        self.filters.retain(|(n, _)| *n != name);
        self.filters.push((name, f));
        self
    }

    pub fn with_function(mut self, name: &'static str, f: FunctionFn) -> Self {
        self.functions.retain(|(n, _)| *n != name);
        self.functions.push((name, f));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.filters
            .iter()
            .map(|(n, _)| *n)
            .chain(self.functions.iter().map(|(n, _)| *n))
            .collect()
    }

    pub fn install(&self, tera: &mut Tera) {
        let locale = self.locale;
        for &(name, f) in &self.filters {
            tera.register_filter(name, move |v: &Value, args: &HashMap<String, Value>| {
                f(v, args, locale)
            });
        }
        for &(name, f) in &self.functions {
            tera.register_function(name, move |args: &HashMap<String, Value>| f(args, locale));
        }
    }
}

fn as_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn arg_text(args: &HashMap<String, Value>, key: &str) -> String {
    args.get(key).map(as_text).unwrap_or_default()
}

fn date_range_filter(v: &Value, _args: &HashMap<String, Value>, locale: Locale) -> tera::Result<Value> {
    Ok(Value::String(entry_date_range(v, locale)))
}

fn date_filter(v: &Value, args: &HashMap<String, Value>, locale: Locale) -> tera::Result<Value> {
    let style = match arg_text(args, "style").as_str() {
        "long" => DateStyle::Long,
        _ => DateStyle::Short,
    };
    Ok(Value::String(format_date(&as_text(v), locale, style)))
}

fn markdown_filter(v: &Value, _args: &HashMap<String, Value>, _locale: Locale) -> tera::Result<Value> {
    Ok(Value::String(inline_html(&as_text(v))))
}

fn no_schema_url_filter(v: &Value, _args: &HashMap<String, Value>, _locale: Locale) -> tera::Result<Value> {
    Ok(Value::String(no_schema_url(&as_text(v))))
}

fn format_location_filter(
    v: &Value,
    _args: &HashMap<String, Value>,
    _locale: Locale,
) -> tera::Result<Value> {
    Ok(Value::String(format_location(v)))
}

fn join_or_empty_filter(
    v: &Value,
    args: &HashMap<String, Value>,
    _locale: Locale,
) -> tera::Result<Value> {
    let sep = args.get("sep").and_then(Value::as_str).unwrap_or(", ");
    let joined = match v {
        Value::Array(items) => items
            .iter()
            .map(as_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(sep),
        other => as_text(other),
    };
    Ok(Value::String(joined))
}

fn icon_function(args: &HashMap<String, Value>, _locale: Locale) -> tera::Result<Value> {
    Ok(Value::String(icons::svg(&arg_text(args, "name")).to_string()))
}

fn label_function(args: &HashMap<String, Value>, locale: Locale) -> tera::Result<Value> {
    let key = arg_text(args, "key");
    Ok(Value::String(locale.label(&key).to_string()))
}

fn render_page<T: Serialize>(
    name: &str,
    source: &str,
    view: &T,
    helpers: &Helpers,
) -> anyhow::Result<String> {
    let mut tera = Tera::default();
    helpers.install(&mut tera);
    tera.add_raw_template(name, source)
        .with_context(|| format!("compile template: {name}"))?;
    let mut ctx = Context::from_serialize(view).context("build template context")?;
    ctx.insert("css", STYLE_CSS);
    let html = tera
        .render(name, &ctx)
        .with_context(|| format!("render template: {name}"))?;
    log::debug!("rendered {name}: {} bytes before minify", html.len());
    Ok(minify_html(&html))
}

pub fn render_resume(view: &ResumeView, helpers: &Helpers) -> anyhow::Result<String> {
    render_page("resume.html", RESUME_TEMPLATE, view, helpers)
}

pub fn render_letter(view: &LetterView, helpers: &Helpers) -> anyhow::Result<String> {
    render_page("cover-letter.html", LETTER_TEMPLATE, view, helpers)
}
