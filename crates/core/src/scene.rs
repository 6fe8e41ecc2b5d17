//! Retained element tree for the drawing surfaces.
//!
//! Elements are plain tag/attribute/children nodes so that both the SVG
//! writer and tests can inspect exactly what a render produced.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Sets an attribute, replacing any previous value.
    pub fn attr(mut self, key: &str, value: impl ToString) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn set_attr(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string();
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key.to_string(), value)),
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Depth-first search over this element and its descendants.
    pub fn find_all<'a>(&'a self, pred: &dyn Fn(&Element) -> bool, out: &mut Vec<&'a Element>) {
        if pred(self) {
            out.push(self);
        }
        for c in &self.children {
            c.find_all(pred, out);
        }
    }

    pub fn write_markup(&self, out: &mut String, indent: usize) {
        let pad = "  ".repeat(indent);
        let _ = write!(out, "{pad}<{}", self.tag);
        for (k, v) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", k, escape(v));
        }
        if self.children.is_empty() && self.text.is_none() {
            out.push_str("/>\n");
            return;
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        if !self.children.is_empty() {
            out.push('\n');
            for c in &self.children {
                c.write_markup(out, indent + 1);
            }
            out.push_str(&pad);
        }
        let _ = writeln!(out, "</{}>", self.tag);
    }
}

/// A drawing surface with a fixed pixel size, laid out before rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub children: Vec<Element>,
}

impl Surface {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            children: Vec::new(),
        }
    }

    pub fn append(&mut self, el: Element) {
        self.children.push(el);
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn select_all(&self, pred: &dyn Fn(&Element) -> bool) -> Vec<&Element> {
        let mut out = Vec::new();
        for c in &self.children {
            c.find_all(pred, &mut out);
        }
        out
    }

    pub fn select_class(&self, class: &str) -> Vec<&Element> {
        self.select_all(&|e| e.has_class(class))
    }

    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" id=\"{}\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">",
            escape(&self.id),
            self.width,
            self.height,
            self.width,
            self.height
        );
        for c in &self.children {
            c.write_markup(&mut out, 1);
        }
        out.push_str("</svg>\n");
        out
    }
}

/// The region hosting the surfaces; overlays such as the tooltip are
/// appended here rather than to an SVG surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerRegion {
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub children: Vec<Element>,
}

impl ContainerRegion {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            children: Vec::new(),
        }
    }

    pub fn append(&mut self, el: Element) {
        self.children.push(el);
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.children.iter().find(|e| e.get_attr("id") == Some(id))
    }
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_replace_and_query() {
        let el = Element::new("rect").attr("class", "tile big").attr("x", 1).attr("x", 2);
        assert_eq!(el.get_attr("x"), Some("2"));
        assert!(el.has_class("tile"));
        assert!(!el.has_class("til"));
    }

    #[test]
    fn markup_escapes_text_and_attributes() {
        let mut s = Surface::new("chart", 10.0, 10.0);
        s.append(
            Element::new("g")
                .child(Element::new("text").attr("data-name", "A & \"B\"").text("<x>")),
        );
        let svg = s.to_svg();
        assert!(svg.contains("data-name=\"A &amp; &quot;B&quot;\""));
        assert!(svg.contains("&lt;x&gt;"));
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn select_class_walks_nested_groups() {
        let mut s = Surface::new("chart", 10.0, 10.0);
        for _ in 0..3 {
            s.append(Element::new("g").child(Element::new("rect").attr("class", "tile")));
        }
        assert_eq!(s.select_class("tile").len(), 3);
    }
}
