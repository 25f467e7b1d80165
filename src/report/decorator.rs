// Error decorator - maps markup tags emitted by error renderers to text transforms

use console::Style;
use std::collections::BTreeMap;
use std::fmt;

/// Tags an error renderer may emit. Anything else is outside the contract.
pub const KNOWN_TAGS: &[&str] = &[
    "span user-agent",
    "span subtitle",
    "div message",
    "div screenshot-info",
    "a screenshot-path",
    "code",
    "span syntax-string",
    "span syntax-punctuator",
    "span syntax-keyword",
    "span syntax-number",
    "span syntax-regex",
    "span syntax-comment",
    "span syntax-invalid",
    "div code-frame",
    "div code-line",
    "div code-line-last",
    "div code-line-num",
    "div code-line-num-base",
    "div code-line-src",
    "div stack",
    "div stack-line",
    "div stack-line-last",
    "div stack-line-name",
    "div stack-line-location",
    "strong",
    "a",
];

/// The styles behind each palette role.
///
/// A plugin can replace any of them before handing the palette to the host.
#[derive(Debug, Clone)]
pub struct PaletteStyles {
    pub grey: Style,
    pub grey_underline: Style,
    pub grey_bold: Style,
    pub bold: Style,
    pub bold_red: Style,
    pub underline: Style,
    pub green: Style,
    pub red: Style,
    pub cyan: Style,
    pub magenta: Style,
    pub yellow: Style,
    pub inverse: Style,
    pub bg_red: Style,
}

impl Default for PaletteStyles {
    fn default() -> Self {
        Self {
            grey: Style::new().color256(8),
            grey_underline: Style::new().color256(8).underlined(),
            grey_bold: Style::new().color256(8).bold(),
            bold: Style::new().bold(),
            bold_red: Style::new().bold().red(),
            underline: Style::new().underlined(),
            green: Style::new().green(),
            red: Style::new().red(),
            cyan: Style::new().cyan(),
            magenta: Style::new().magenta(),
            yellow: Style::new().yellow(),
            inverse: Style::new().reverse(),
            bg_red: Style::new().on_red(),
        }
    }
}

/// Terminal styles used by the host and its decorator.
///
/// Every style is forced on or off at construction, so output does not
/// depend on whether the process happens to be attached to a terminal.
#[derive(Debug, Clone)]
pub struct Palette {
    enabled: bool,
    styles: PaletteStyles,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self::with_styles(enabled, PaletteStyles::default())
    }

    pub fn with_styles(enabled: bool, styles: PaletteStyles) -> Self {
        Self { enabled, styles }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn styles(&self) -> &PaletteStyles {
        &self.styles
    }

    pub fn styles_mut(&mut self) -> &mut PaletteStyles {
        &mut self.styles
    }

    fn paint(&self, style: &Style, text: &str) -> String {
        style
            .clone()
            .force_styling(self.enabled)
            .apply_to(text)
            .to_string()
    }

    pub fn grey(&self, text: &str) -> String {
        self.paint(&self.styles.grey, text)
    }

    pub fn grey_underline(&self, text: &str) -> String {
        self.paint(&self.styles.grey_underline, text)
    }

    pub fn grey_bold(&self, text: &str) -> String {
        self.paint(&self.styles.grey_bold, text)
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint(&self.styles.bold, text)
    }

    pub fn bold_red(&self, text: &str) -> String {
        self.paint(&self.styles.bold_red, text)
    }

    pub fn underline(&self, text: &str) -> String {
        self.paint(&self.styles.underline, text)
    }

    pub fn green(&self, text: &str) -> String {
        self.paint(&self.styles.green, text)
    }

    pub fn red(&self, text: &str) -> String {
        self.paint(&self.styles.red, text)
    }

    pub fn cyan(&self, text: &str) -> String {
        self.paint(&self.styles.cyan, text)
    }

    pub fn magenta(&self, text: &str) -> String {
        self.paint(&self.styles.magenta, text)
    }

    pub fn yellow(&self, text: &str) -> String {
        self.paint(&self.styles.yellow, text)
    }

    pub fn inverse(&self, text: &str) -> String {
        self.paint(&self.styles.inverse, text)
    }

    pub fn bg_red(&self, text: &str) -> String {
        self.paint(&self.styles.bg_red, text)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(false)
    }
}

type Transform = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Per-host table of tag transforms.
pub struct ErrorDecorator {
    transforms: BTreeMap<&'static str, Transform>,
}

impl ErrorDecorator {
    /// Build the table against `palette`.
    pub fn new(palette: &Palette) -> Self {
        let mut transforms: BTreeMap<&'static str, Transform> = BTreeMap::new();

        macro_rules! styled {
            ($tag:literal, $method:ident) => {{
                let p = palette.clone();
                transforms.insert($tag, Box::new(move |s: &str| p.$method(s)));
            }};
        }

        fn identity(s: &str) -> String {
            s.to_string()
        }

        styled!("span user-agent", grey);
        {
            let p = palette.clone();
            transforms.insert(
                "span subtitle",
                Box::new(move |s: &str| format!("- {} -", p.bold_red(s))),
            );
        }
        styled!("div message", bold_red);

        transforms.insert("div screenshot-info", Box::new(identity));
        styled!("a screenshot-path", grey_underline);

        transforms.insert("code", Box::new(identity));

        styled!("span syntax-string", green);
        styled!("span syntax-punctuator", grey);
        styled!("span syntax-keyword", cyan);
        styled!("span syntax-number", magenta);
        styled!("span syntax-regex", magenta);
        styled!("span syntax-comment", grey_bold);
        styled!("span syntax-invalid", inverse);

        transforms.insert("div code-frame", Box::new(identity));
        transforms.insert("div code-line", Box::new(|s: &str| format!("{s}\n")));
        transforms.insert("div code-line-last", Box::new(identity));
        transforms.insert("div code-line-num", Box::new(|s: &str| format!("   {s} |")));
        {
            let p = palette.clone();
            transforms.insert(
                "div code-line-num-base",
                Box::new(move |s: &str| format!("{}|", p.bg_red(&format!(" > {s} ")))),
            );
        }
        transforms.insert("div code-line-src", Box::new(identity));

        transforms.insert("div stack", Box::new(|s: &str| format!("\n\n{s}")));
        transforms.insert("div stack-line", Box::new(|s: &str| format!("{s}\n")));
        transforms.insert("div stack-line-last", Box::new(identity));
        {
            let p = palette.clone();
            transforms.insert(
                "div stack-line-name",
                Box::new(move |s: &str| format!("   at {}", p.bold(s))),
            );
        }
        {
            let p = palette.clone();
            transforms.insert(
                "div stack-line-location",
                Box::new(move |s: &str| format!(" ({})", p.grey_underline(s))),
            );
        }

        styled!("strong", bold);
        {
            let p = palette.clone();
            transforms.insert("a", Box::new(move |s: &str| format!("\"{}\"", p.underline(s))));
        }

        Self { transforms }
    }

    /// Apply the transform registered for `tag`, or `None` if the tag is unknown.
    pub fn decorate(&self, tag: &str, text: &str) -> Option<String> {
        self.transforms.get(tag).map(|transform| transform(text))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.transforms.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.transforms.keys().copied()
    }
}

impl fmt::Debug for ErrorDecorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorDecorator")
            .field("tags", &self.transforms.keys().collect::<Vec<_>>())
            .finish()
    }
}
