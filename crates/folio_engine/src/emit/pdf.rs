use std::path::{Path, PathBuf};

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};

use super::{Cover, EmitError, Emitter, Lifecycle};
use crate::persist::persist_artifact;

const PT_TO_MM: f32 = 25.4 / 72.0;
/// Courier advances every glyph by 0.6 em.
const COURIER_ADVANCE_EM: f32 = 0.6;
const TAB: &str = "    ";
const REPLACEMENT: char = '?';

/// Page geometry and type sizes. Defaults to A4 with 15 mm margins.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLayout {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub title_size_pt: f32,
    pub heading_size_pt: f32,
    pub body_size_pt: f32,
    pub title_pitch_mm: f32,
    pub heading_pitch_mm: f32,
    pub body_pitch_mm: f32,
}

impl Default for PdfLayout {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 15.0,
            title_size_pt: 12.0,
            heading_size_pt: 11.0,
            body_size_pt: 9.0,
            title_pitch_mm: 8.0,
            heading_pitch_mm: 7.0,
            body_pitch_mm: 5.0,
        }
    }
}

impl PdfLayout {
    fn size_and_pitch(&self, style: LineStyle) -> (f32, f32) {
        match style {
            LineStyle::Title => (self.title_size_pt, self.title_pitch_mm),
            LineStyle::Heading => (self.heading_size_pt, self.heading_pitch_mm),
            LineStyle::Body => (self.body_size_pt, self.body_pitch_mm),
        }
    }

    /// Monospaced characters that fit between the margins at `size_pt`.
    pub fn chars_per_line(&self, size_pt: f32) -> usize {
        let printable = self.page_width_mm - 2.0 * self.margin_mm;
        let advance = COURIER_ADVANCE_EM * size_pt * PT_TO_MM;
        ((printable / advance).floor() as usize).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineStyle {
    Title,
    Heading,
    Body,
}

#[derive(Debug, Clone, PartialEq)]
struct PlacedLine {
    text: String,
    style: LineStyle,
    y_mm: f32,
}

/// Lays out lines top to bottom, opening a new page when the bottom margin is reached.
#[derive(Debug)]
struct PageComposer {
    layout: PdfLayout,
    pages: Vec<Vec<PlacedLine>>,
    cursor_mm: f32,
}

impl PageComposer {
    fn new(layout: PdfLayout) -> Self {
        Self {
            layout,
            pages: Vec::new(),
            cursor_mm: 0.0,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.cursor_mm = self.layout.page_height_mm - self.layout.margin_mm;
    }

    fn push_wrapped(&mut self, raw: &str, style: LineStyle) {
        let (size, _) = self.layout.size_and_pitch(style);
        let width = self.layout.chars_per_line(size);
        for line in wrap_line(&pdf_safe(raw), width) {
            self.push_line(line, style);
        }
    }

    fn push_line(&mut self, text: String, style: LineStyle) {
        let (_, pitch) = self.layout.size_and_pitch(style);
        if self.pages.is_empty() || self.cursor_mm - pitch < self.layout.margin_mm {
            self.new_page();
        }
        self.cursor_mm -= pitch;
        let y_mm = self.cursor_mm;
        if let Some(page) = self.pages.last_mut() {
            page.push(PlacedLine { text, style, y_mm });
        }
    }
}

/// One section per file, each starting on a fresh page, rendered with the
/// built-in Courier fonts.
pub struct PdfEmitter {
    composer: PageComposer,
    cover: Option<Cover>,
    state: Lifecycle,
    units: usize,
}

impl PdfEmitter {
    pub fn new(layout: PdfLayout, cover: Option<Cover>) -> Self {
        Self {
            composer: PageComposer::new(layout),
            cover,
            state: Lifecycle::Created,
            units: 0,
        }
    }

    pub fn page_count(&self) -> usize {
        self.composer.pages.len().max(1)
    }

    fn render(&self) -> Result<Vec<u8>, EmitError> {
        let layout = &self.composer.layout;
        let width = Mm(layout.page_width_mm);
        let height = Mm(layout.page_height_mm);
        let title = self
            .cover
            .as_ref()
            .map(|c| c.title.clone())
            .unwrap_or_else(|| "folio".to_string());

        let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Courier)
            .map_err(|e| EmitError::Pdf(format!("{e:?}")))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::CourierBold)
            .map_err(|e| EmitError::Pdf(format!("{e:?}")))?;

        for (index, lines) in self.composer.pages.iter().enumerate() {
            let (page, layer) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(width, height, "Layer 1")
            };
            let layer = doc.get_page(page).get_layer(layer);
            for line in lines {
                let (size, _) = layout.size_and_pitch(line.style);
                let font: &IndirectFontRef = match line.style {
                    LineStyle::Title | LineStyle::Heading => &bold,
                    LineStyle::Body => &regular,
                };
                layer.use_text(
                    line.text.clone(),
                    size,
                    Mm(layout.margin_mm),
                    Mm(line.y_mm),
                    font,
                );
            }
        }

        doc.save_to_bytes()
            .map_err(|e| EmitError::Pdf(format!("{e:?}")))
    }
}

impl Emitter for PdfEmitter {
    fn begin(&mut self) -> Result<(), EmitError> {
        self.state.begin("PdfEmitter");
        if let Some(cover) = &self.cover {
            self.composer.new_page();
            self.composer.push_wrapped("Files in:", LineStyle::Title);
            self.composer.push_wrapped(&cover.title, LineStyle::Title);
            for line in &cover.tree {
                self.composer.push_wrapped(line, LineStyle::Body);
            }
        }
        Ok(())
    }

    fn append(&mut self, label: &str, content: &str) -> Result<(), EmitError> {
        self.state.check_append("PdfEmitter");
        self.composer.new_page();
        self.composer.push_wrapped(label, LineStyle::Heading);
        for line in content.lines() {
            self.composer.push_wrapped(line, LineStyle::Body);
        }
        self.units += 1;
        Ok(())
    }

    fn finish(&mut self, output: &Path) -> Result<PathBuf, EmitError> {
        self.state.finish("PdfEmitter");
        let bytes = self.render()?;
        Ok(persist_artifact(output, &bytes)?)
    }

    fn units(&self) -> usize {
        self.units
    }
}

/// Replace what the built-in fonts cannot show: tabs become spaces, anything
/// outside printable Latin-1 becomes `?`.
///
/// The WinAnsi text encoding has no code for no-break space or soft hyphen,
/// so those become a plain space and hyphen.
fn pdf_safe(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '\t' => out.push_str(TAB),
            '\u{A0}' => out.push(' '),
            '\u{AD}' => out.push('-'),
            ' '..='~' | '\u{A1}'..='\u{FF}' => out.push(c),
            '\r' => {}
            _ => out.push(REPLACEMENT),
        }
    }
    out
}

/// Hard-wrap to `width` characters, preferring the last space of each chunk.
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let mut rest: Vec<char> = line.chars().collect();
    if rest.len() <= width {
        return vec![line.to_string()];
    }

    let mut out = Vec::new();
    while rest.len() > width {
        // Look one past the limit so a space right at the boundary is used.
        let split = rest[..=width]
            .iter()
            .rposition(|&c| c == ' ')
            .filter(|&i| i > 0)
            .unwrap_or(width);
        let tail = rest.split_off(split);
        out.push(rest.iter().collect());
        rest = if tail.first() == Some(&' ') {
            tail[1..].to_vec()
        } else {
            tail
        };
    }
    if !rest.is_empty() {
        out.push(rest.into_iter().collect());
    }
    out
}
