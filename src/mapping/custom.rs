//! Legacy path dialect.
//!
//! Deployments migrating from an older image service keep their URL shapes.
//! A configured rewrite rule first turns the legacy path into one carrying
//! `w=<n>` / `h=<n>` tokens, then the tokens are mapped like any other
//! dimensions:
//!
//! ```text
//! /300x200/photos/dawn.jpg
//!   ── rewrite "/(\d+)x(\d+)\/(.*)/" → "w=$1&h=$2/$3" ──▶
//!   /w=300&h=200/photos/dawn.jpg
//!   ── map ──▶  { resize: { width: 300, height: 200 } }
//! ```
//!
//! ## Rewrite Patterns
//!
//! Patterns may be written in `/body/flags` form. Flags `i`, `m` and `s`
//! become inline regex flags, `g` replaces every match instead of only the
//! first, `u` is accepted and ignored. Any other flag, `y` included, fails
//! to compile. A pattern that does not start with `/` is compiled verbatim.
//! Substitutions use `$1`, `$<name>`, `$&` and `$$`; `` $` `` and `$'` are
//! not supported and stay literal.
//!
//! ## Crop and Fit-In
//!
//! Crop and fit-in tokens are not read from legacy paths. Both field mappers
//! exist and always return no edit, so requests relying on them are served
//! uncropped.

use super::{EditMapper, MapperError, MissingItem, RequestStyle, map_resize};
use crate::config::RewriteConfig;
use crate::edits::{ImageEdits, merge_edits};
use crate::request::RequestDescriptor;
use crate::types::ImageFormat;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static WIDTH_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"w=(\d+)").expect("static regex"));
static HEIGHT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"h=(\d+)").expect("static regex"));
static FILE_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.([a-z0-9]+)(\?|$)").expect("static regex"));

/// Flags with a regex-crate counterpart. JavaScript's sticky `y` has none.
const KNOWN_FLAGS: &str = "gimsu";

/// A compiled rewrite pattern.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    regex: Regex,
    global: bool,
}

impl RewriteRule {
    /// Compile a pattern, honouring the optional `/body/flags` wrapping.
    ///
    /// Unknown or repeated flags are rejected rather than folded into the body.
    pub fn parse(pattern: &str) -> Result<Self, regex::Error> {
        let (body, flags) = split_delimited(pattern).unwrap_or((pattern, ""));

        let mut inline = String::new();
        let mut global = false;
        for (i, flag) in flags.char_indices() {
            if !KNOWN_FLAGS.contains(flag) || flags[..i].contains(flag) {
                return Err(regex::Error::Syntax(format!(
                    "invalid flags '{flags}' in rewrite pattern {pattern}"
                )));
            }
            match flag {
                'g' => global = true,
                'i' | 'm' | 's' => inline.push(flag),
                _ => {}
            }
        }

        let source = if inline.is_empty() {
            body.to_string()
        } else {
            format!("(?{inline}){body}")
        };

        Ok(Self {
            regex: Regex::new(&source)?,
            global,
        })
    }

    /// Translate a `String.replace`-style template for this rule's groups.
    pub fn expand_template(&self, template: &str) -> String {
        translate_substitution(template, &self.regex)
    }

    /// Apply the rule to `path` with an already-translated substitution.
    pub fn apply(&self, path: &str, substitution: &str) -> String {
        if self.global {
            self.regex.replace_all(path, substitution).into_owned()
        } else {
            self.regex.replace(path, substitution).into_owned()
        }
    }
}

/// Split `/body/flags` into its parts. `None` if the pattern is not wrapped.
fn split_delimited(pattern: &str) -> Option<(&str, &str)> {
    pattern
        .strip_prefix('/')
        .and_then(|rest| rest.rsplit_once('/'))
}

/// Translate `$n` / `$nn` / `$<name>` / `$&` / `$$` placeholders to
/// regex-crate syntax.
///
/// `$nn` takes two digits only when that group exists, then falls back to
/// `$n`. References to groups `regex` does not have, `$0` included, stay
/// literal text. So do `$<name>` when the pattern has no named groups and
/// any other `$` sequence.
pub(crate) fn translate_substitution(template: &str, regex: &Regex) -> String {
    let groups = regex.captures_len() - 1;
    let has_names = regex.capture_names().flatten().next().is_some();
    let group_at = |digits: &[char]| -> Option<usize> {
        let n = digits.iter().collect::<String>().parse::<usize>().ok()?;
        (1..=groups).contains(&n).then_some(n)
    };

    let chars: Vec<char> = template.chars().collect();
    let mut out = String::with_capacity(template.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.get(i).copied() {
            Some('$') => {
                i += 1;
                out.push_str("$$");
            }
            Some('&') => {
                i += 1;
                out.push_str("${0}");
            }
            Some(d) if d.is_ascii_digit() => {
                let two = chars
                    .get(i..i + 2)
                    .filter(|pair| pair[1].is_ascii_digit())
                    .and_then(group_at);
                match two.or_else(|| group_at(&chars[i..i + 1])) {
                    Some(n) => {
                        i += if two.is_some() { 2 } else { 1 };
                        out.push_str(&format!("${{{n}}}"));
                    }
                    None => out.push_str("$$"),
                }
            }
            Some('<') if has_names => {
                let end = chars[i..].iter().position(|&c| c == '>');
                match end {
                    Some(end) => {
                        let name: String = chars[i + 1..i + end].iter().collect();
                        i += end + 1;
                        out.push_str(&format!("${{{name}}}"));
                    }
                    None => out.push_str("$$"),
                }
            }
            _ => out.push_str("$$"),
        }
    }
    out
}

/// Mapper for legacy path-encoded requests.
#[derive(Debug, Clone, Default)]
pub struct CustomMapper {
    rule: Option<RewriteRule>,
    substitution: Option<String>,
}

impl CustomMapper {
    /// Compile the configured rewrite. Missing options are only reported
    /// when a rewrite is attempted.
    pub fn new(config: &RewriteConfig) -> Result<Self, MapperError> {
        let rule = config
            .match_pattern
            .as_deref()
            .map(RewriteRule::parse)
            .transpose()?;
        let substitution = config.substitution.as_deref().map(|template| match &rule {
            Some(rule) => rule.expand_template(template),
            None => template.to_string(),
        });
        Ok(Self { rule, substitution })
    }

    /// Rewrite a legacy path with the configured pattern and substitution.
    ///
    /// Checks, in order: the path, the pattern, the substitution.
    pub fn parse_custom_path(&self, path: Option<&str>) -> Result<String, MapperError> {
        let path = path.ok_or(MapperError::MissingConfiguration(MissingItem::Path))?;
        let rule = self
            .rule
            .as_ref()
            .ok_or(MapperError::MissingConfiguration(MissingItem::RewriteMatchPattern))?;
        let substitution = self
            .substitution
            .as_deref()
            .ok_or(MapperError::MissingConfiguration(MissingItem::RewriteSubstitution))?;

        Ok(rule.apply(path, substitution))
    }

    /// Map an already-rewritten path to edits.
    pub fn map_path_to_edits(&self, path: &str) -> ImageEdits {
        let format = extract_file_format(path);
        let edits = merge_edits([map_crop(path), map_path_resize(path), map_fit_in(path)]);
        debug!(
            style = %self.style(),
            path,
            format = ?format,
            edits = ?edits.keys().collect::<Vec<_>>(),
            "mapped request"
        );
        edits
    }
}

impl EditMapper for CustomMapper {
    fn style(&self) -> RequestStyle {
        RequestStyle::Custom
    }

    fn map_to_edits(&self, request: &RequestDescriptor) -> Result<ImageEdits, MapperError> {
        let path = Some(request.path.as_str()).filter(|p| !p.is_empty());
        let rewritten = self.parse_custom_path(path)?;
        Ok(self.map_path_to_edits(&rewritten))
    }
}

/// Crop tokens are not read from legacy paths.
fn map_crop(_path: &str) -> ImageEdits {
    ImageEdits::new()
}

/// Fit-in tokens are not read from legacy paths.
fn map_fit_in(_path: &str) -> ImageEdits {
    ImageEdits::new()
}

/// Both `w=` and `h=` must be present for a resize.
fn map_path_resize(path: &str) -> ImageEdits {
    let width = WIDTH_TOKEN.captures(path).and_then(|c| c.get(1));
    let height = HEIGHT_TOKEN.captures(path).and_then(|c| c.get(1));

    match (width, height) {
        (Some(w), Some(h)) => map_resize(Some(w.as_str()), Some(h.as_str())),
        _ => ImageEdits::new(),
    }
}

/// Format of the first `.ext` that ends the path or precedes a `?`.
pub(crate) fn extract_file_format(path: &str) -> Option<ImageFormat> {
    FILE_EXTENSION
        .captures(path)
        .and_then(|c| c.get(1))
        .and_then(|ext| ext.as_str().parse().ok())
}
