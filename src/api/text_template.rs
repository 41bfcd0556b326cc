use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;

use crate::core::{
    AxisType, CellValue, DateTimePattern, NumberFormatter, Point, Series, SeriesType,
    normalize_value,
};

use super::ChartOptions;

pub const TOKEN_NAME: &str = "@@name";
pub const TOKEN_X: &str = "@@x";
pub const TOKEN_Y: &str = "@@y";
pub const TOKEN_Y_ERROR: &str = "@@yError";
pub const TOKEN_Y_PERCENT: &str = "@@yPercent";
pub const TOKEN_SIZE: &str = "@@size";

// `{{ key }}` resolves any token, including raw column names; bare `@@ident` resolves built-ins.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([^\s{}]+?)\s*\}\}|@@([A-Za-z_][A-Za-z0-9_]*)")
        .expect("token pattern is valid")
});

/// Pre-formatted values available to a text template, keyed by token name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenBag {
    values: IndexMap<String, String>,
}

impl TokenBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: impl Into<String>, value: impl Into<String>) {
        self.values.insert(token.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.values.contains_key(token)
    }

    /// Merges raw record fields; a field shadows a token of the same name.
    pub fn extend_raw<'a>(&mut self, raw: impl IntoIterator<Item = (&'a String, &'a CellValue)>) {
        for (field, value) in raw {
            self.values.insert(field.clone(), value.to_string());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Token { key: String, source: String },
}

/// A user template compiled into literal and token segments.
///
/// Tokens missing from the bag are emitted literally, exactly as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextTemplate {
    segments: SmallVec<[Segment; 8]>,
}

impl TextTemplate {
    #[must_use]
    pub fn compile(template: &str) -> Self {
        let mut segments = SmallVec::new();
        let mut last = 0;
        for captures in TOKEN_RE.captures_iter(template) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            if whole.start() > last {
                segments.push(Segment::Literal(template[last..whole.start()].to_owned()));
            }
            let key = match (captures.get(1), captures.get(2)) {
                (Some(inner), _) => inner.as_str().to_owned(),
                (None, Some(name)) => format!("@@{}", name.as_str()),
                (None, None) => whole.as_str().to_owned(),
            };
            segments.push(Segment::Token {
                key,
                source: whole.as_str().to_owned(),
            });
            last = whole.end();
        }
        if last < template.len() {
            segments.push(Segment::Literal(template[last..].to_owned()));
        }
        Self { segments }
    }

    #[must_use]
    pub fn render(&self, bag: &TokenBag) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Token { key, source } => {
                    out.push_str(bag.get(key).unwrap_or(source.as_str()));
                }
            }
        }
        out
    }
}

/// Text rendering strategy for one preparation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextFormatter {
    /// `<yPercent> (<y>)`.
    DefaultPie,
    /// `<y>`, then `± <yError>`, then `<yPercent> (...)`, then `: <size>`.
    DefaultSeries,
    Template(TextTemplate),
}

impl TextFormatter {
    #[must_use]
    pub fn new(text_format: &str, pie: bool) -> Self {
        if !text_format.is_empty() {
            Self::Template(TextTemplate::compile(text_format))
        } else if pie {
            Self::DefaultPie
        } else {
            Self::DefaultSeries
        }
    }

    #[must_use]
    pub fn render(&self, bag: &TokenBag) -> String {
        match self {
            Self::DefaultPie => format!(
                "{} ({})",
                bag.get(TOKEN_Y_PERCENT).unwrap_or_default(),
                bag.get(TOKEN_Y).unwrap_or_default()
            ),
            Self::DefaultSeries => default_series_text(bag),
            Self::Template(template) => template.render(bag),
        }
    }
}

fn default_series_text(bag: &TokenBag) -> String {
    let mut text = bag.get(TOKEN_Y).unwrap_or_default().to_owned();
    if let Some(error) = bag.get(TOKEN_Y_ERROR) {
        text = format!("{text} \u{00B1} {error}");
    }
    if let Some(percent) = bag.get(TOKEN_Y_PERCENT) {
        text = format!("{percent} ({text})");
    }
    if let Some(size) = bag.get(TOKEN_SIZE) {
        text = format!("{text}: {size}");
    }
    text
}

/// Formatters shared by every series of one preparation pass.
#[derive(Debug, Clone)]
pub struct SeriesTextRenderer<'a> {
    options: &'a ChartOptions,
    number: NumberFormatter,
    percent: NumberFormatter,
    date_time: DateTimePattern,
    formatter: TextFormatter,
    with_percent: bool,
    pie: bool,
}

impl<'a> SeriesTextRenderer<'a> {
    #[must_use]
    pub fn new(options: &'a ChartOptions) -> Self {
        let pie = options.global_series_type == SeriesType::Pie;
        Self {
            options,
            number: NumberFormatter::new(&options.number_format),
            percent: NumberFormatter::new(&options.percent_format),
            date_time: DateTimePattern::new(&options.date_time_format),
            formatter: TextFormatter::new(&options.text_format, pie),
            with_percent: pie || options.series.percent_values,
            pie,
        }
    }

    /// Builds the token bag for one position of a series.
    ///
    /// `point` is `None` for gap positions introduced by x unification; those
    /// only carry the series name, the x value and an empty `y`.
    #[must_use]
    pub fn token_bag(
        &self,
        series_name: &str,
        series_type: SeriesType,
        y_axis_type: Option<AxisType>,
        x: &CellValue,
        point: Option<&Point>,
    ) -> TokenBag {
        let mut bag = TokenBag::new();
        bag.insert(TOKEN_NAME, series_name);

        let x_axis_type = self.options.x_axis.axis_type;
        let Some(point) = point else {
            bag.insert(
                TOKEN_X,
                normalize_value(x, x_axis_type, &self.date_time).to_string(),
            );
            bag.insert(TOKEN_Y, String::new());
            return bag;
        };

        bag.insert(
            TOKEN_X,
            normalize_value(&point.row.x, x_axis_type, &self.date_time).to_string(),
        );
        let y = if series_type.formats_y_as_axis_value() {
            normalize_value(&point.row.y, y_axis_type, &self.date_time).to_string()
        } else {
            self.number.format(point.y)
        };
        bag.insert(TOKEN_Y, y);
        if point.y_error.is_some() {
            bag.insert(TOKEN_Y_ERROR, self.number.format(point.y_error));
        }
        if point.size.is_some() {
            bag.insert(TOKEN_SIZE, self.number.format(point.size));
        }
        // A NaN share (zero total) still counts as present and renders empty.
        if let Some(share) = point.y_percent.filter(|_| self.with_percent) {
            bag.insert(TOKEN_Y_PERCENT, self.percent.format(Some(share.abs())));
        }
        bag.extend_raw(&point.row.raw);
        bag
    }

    /// Fills `text` and `hover` for every position of the series' x (or
    /// label) array.
    pub fn render_series(&self, series: &mut Series) {
        let series_type = self.options.resolve_series_type(series);
        let y_axis_type = self.options.y_axis_type_for(series);
        let keys = if self.pie { &series.labels } else { &series.x };

        let text: Vec<String> = keys
            .iter()
            .map(|x| {
                let bag = self.token_bag(
                    &series.name,
                    series_type,
                    y_axis_type,
                    x,
                    series.source_data.get(x),
                );
                self.formatter.render(&bag)
            })
            .collect();

        series.hover = text.clone();
        series.text = text;
    }
}
