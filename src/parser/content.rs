//! Content stream interpretation: text operators to positioned fragments.

use std::collections::HashMap;

use lopdf::content::Operation;
use lopdf::Object;

use crate::model::Fragment;

use super::font::{get_number, PageFont};

/// `TJ` adjustments beyond this many thousandths of an em read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// A 2D affine transform `[a b c d e f]` as used by PDF.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self` applied first, then `other`.
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn origin(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    /// Length of the transformed unit x vector.
    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn from_operands(operands: &[Object]) -> Option<Self> {
        if operands.len() < 6 {
            return None;
        }
        let n: Vec<f32> = operands[..6].iter().filter_map(get_number).collect();
        if n.len() != 6 {
            return None;
        }
        Some(Self::new(n[0], n[1], n[2], n[3], n[4], n[5]))
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Text state parameters that survive `BT`/`ET`.
#[derive(Debug, Clone, Copy)]
struct TextState {
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scaling: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scaling: 1.0,
            leading: 0.0,
        }
    }
}

/// Graphics state saved and restored by `q`/`Q`.
#[derive(Debug, Clone, Default)]
struct GraphicsState {
    ctm: Matrix,
    text: TextState,
    font_name: Vec<u8>,
}

/// Walks a page's operations and records one fragment per text-showing
/// operator (`Tj`, `TJ`, `'`, `"`).
pub(crate) struct ContentWalker<'f, 'a> {
    fonts: &'f HashMap<Vec<u8>, PageFont<'a>>,
    fallback_font: PageFont<'static>,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    in_text_object: bool,
    fragments: Vec<Fragment>,
}

impl<'f, 'a> ContentWalker<'f, 'a> {
    /// Create a walker that resolves `Tf` names against `fonts`.
    pub fn new(fonts: &'f HashMap<Vec<u8>, PageFont<'a>>) -> Self {
        Self {
            fonts,
            fallback_font: PageFont::fallback(),
            state: GraphicsState::default(),
            stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            in_text_object: false,
            fragments: Vec::new(),
        }
    }

    /// Interpret all operations and return the fragments found.
    pub fn walk(mut self, operations: &[Operation]) -> Vec<Fragment> {
        for op in operations {
            self.apply(op);
        }
        self.fragments
    }

    fn apply(&mut self, op: &Operation) {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => self.stack.push(self.state.clone()),
            "Q" => {
                if let Some(saved) = self.stack.pop() {
                    self.state = saved;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.state.ctm = m.then(&self.state.ctm);
                }
            }
            "BT" => {
                self.in_text_object = true;
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "ET" => self.in_text_object = false,
            "Tf" => {
                if let Some(Object::Name(name)) = operands.first() {
                    self.state.font_name = name.clone();
                }
                if let Some(size) = operands.get(1).and_then(get_number) {
                    self.state.text.font_size = size;
                }
            }
            "Tc" => self.set_text_param(operands, |t, v| t.char_spacing = v),
            "Tw" => self.set_text_param(operands, |t, v| t.word_spacing = v),
            "Tz" => self.set_text_param(operands, |t, v| t.horizontal_scaling = v / 100.0),
            "TL" => self.set_text_param(operands, |t, v| t.leading = v),
            "Td" | "TD" => {
                let tx = operands.first().and_then(get_number).unwrap_or(0.0);
                let ty = operands.get(1).and_then(get_number).unwrap_or(0.0);
                if op.operator == "TD" {
                    self.state.text.leading = -ty;
                }
                self.move_line(tx, ty);
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(&[ShowItem::Bytes(bytes)]);
                }
            }
            "TJ" => {
                if let Some(Object::Array(arr)) = operands.first() {
                    let items: Vec<ShowItem> = arr
                        .iter()
                        .filter_map(|item| match item {
                            Object::String(bytes, _) => Some(ShowItem::Bytes(bytes)),
                            other => get_number(other).map(ShowItem::Adjust),
                        })
                        .collect();
                    self.show(&items);
                }
            }
            "'" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(&[ShowItem::Bytes(bytes)]);
                }
            }
            "\"" => {
                if let Some(aw) = operands.first().and_then(get_number) {
                    self.state.text.word_spacing = aw;
                }
                if let Some(ac) = operands.get(1).and_then(get_number) {
                    self.state.text.char_spacing = ac;
                }
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    self.show(&[ShowItem::Bytes(bytes)]);
                }
            }
            _ => {}
        }
    }

    fn set_text_param(&mut self, operands: &[Object], set: impl Fn(&mut TextState, f32)) {
        if let Some(value) = operands.first().and_then(get_number) {
            set(&mut self.state.text, value);
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).then(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.state.text.leading;
        self.move_line(0.0, -leading);
    }

    fn current_font(&self) -> &PageFont<'_> {
        match self.fonts.get(&self.state.font_name) {
            Some(font) => font,
            None => &self.fallback_font,
        }
    }

    /// Show a string (or `TJ` array) and advance the text matrix past it.
    fn show(&mut self, items: &[ShowItem<'_>]) {
        if !self.in_text_object {
            log::debug!("Text-showing operator outside BT/ET ignored");
            return;
        }

        let text_state = self.state.text;
        let start = self.text_matrix.then(&self.state.ctm);

        let mut text = String::new();
        let mut advance = 0.0f32;
        {
            let font = self.current_font();
            for item in items {
                match *item {
                    ShowItem::Bytes(bytes) => {
                        text.push_str(&font.decode(bytes));
                        for glyph in font.metrics.advances(bytes) {
                            let mut tx = glyph.width / 1000.0 * text_state.font_size
                                + text_state.char_spacing;
                            if glyph.is_space {
                                tx += text_state.word_spacing;
                            }
                            advance += tx * text_state.horizontal_scaling;
                        }
                    }
                    ShowItem::Adjust(n) => {
                        advance -= n / 1000.0 * text_state.font_size * text_state.horizontal_scaling;
                        if -n > TJ_SPACE_THRESHOLD && needs_word_space(&text) {
                            text.push(' ');
                        }
                    }
                }
            }
        }

        self.text_matrix = Matrix::translation(advance, 0.0).then(&self.text_matrix);

        if text.is_empty() {
            return;
        }

        let (x, y) = start.origin();
        let width = (advance * start.horizontal_scale()).abs();
        let fragment = Fragment::new(text, x, y, width);
        if fragment.is_finite() {
            self.fragments.push(fragment);
        } else {
            log::debug!("Dropping fragment with non-finite geometry: {:?}", fragment);
        }
    }
}

/// One element of a shown string: glyph bytes or a `TJ` position adjustment.
#[derive(Debug, Clone, Copy)]
enum ShowItem<'b> {
    Bytes(&'b [u8]),
    Adjust(f32),
}

/// Whether a `TJ` gap after `text` should become a space.
fn needs_word_space(text: &str) -> bool {
    match text.chars().last() {
        Some(c) => !c.is_whitespace() && !is_spaceless_script_char(c),
        None => false,
    }
}

/// Check if a character belongs to a script written without word spaces.
///
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}
