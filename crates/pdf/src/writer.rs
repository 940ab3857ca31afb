//! A small flowing-layout PDF writer built on `lopdf`.
//!
//! Content is placed top to bottom inside the page frame (the page minus
//! its margins). Anything that does not fit on the current page starts a
//! new one. Text uses the standard Helvetica fonts with WinAnsiEncoding, so
//! nothing is embedded.

use crate::error::{PdfError, Result};
use crate::metrics::{text_width, to_win_ansi, truncate_to_width};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// Points per inch.
pub const INCH: f32 = 72.0;

/// Page size and margin, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageSetup {
    /// US Letter with 1-inch margins.
    pub const LETTER: PageSetup = PageSetup {
        width: 612.0,
        height: 792.0,
        margin: INCH,
    };

    /// Usable width inside the margins.
    pub fn frame_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Usable height inside the margins.
    pub fn frame_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }

    /// Scale that fits a `width` x `height` image into the frame while
    /// keeping its aspect ratio. May be greater than 1.
    pub fn fit_scale(&self, width: u32, height: u32) -> f32 {
        let scale_w = self.frame_width() / width.max(1) as f32;
        let scale_h = self.frame_height() / height.max(1) as f32;
        scale_w.min(scale_h)
    }
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::LETTER
    }
}

/// The two standard fonts the writer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource_name(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }

    fn base_font(&self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
        }
    }
}

/// An RGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const GREY: Color = Color::rgb(0.502, 0.502, 0.502);
    pub const WHITESMOKE: Color = Color::rgb(0.961, 0.961, 0.961);
    pub const BEIGE: Color = Color::rgb(0.961, 0.961, 0.863);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    fn operands(&self) -> Vec<Object> {
        vec![self.r.into(), self.g.into(), self.b.into()]
    }
}

/// Horizontal alignment of a line of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// How a paragraph is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphStyle {
    pub font: Font,
    pub size: f32,
    pub leading: f32,
    pub align: Align,
    pub color: Color,
}

impl ParagraphStyle {
    /// Body text: Helvetica 10/12, left aligned.
    pub fn normal() -> Self {
        Self {
            font: Font::Regular,
            size: 10.0,
            leading: 12.0,
            align: Align::Left,
            color: Color::BLACK,
        }
    }

    /// Document title: Helvetica-Bold 18/22, centred.
    pub fn title() -> Self {
        Self {
            font: Font::Bold,
            size: 18.0,
            leading: 22.0,
            align: Align::Center,
            color: Color::BLACK,
        }
    }
}

/// Colours, fonts and padding of a table.
///
/// The first row is the header row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStyle {
    pub header_font: Font,
    pub header_size: f32,
    pub header_background: Color,
    pub header_text: Color,
    pub header_bottom_padding: f32,
    pub body_font: Font,
    pub body_size: f32,
    pub body_background: Color,
    pub body_text: Color,
    pub grid: Color,
    pub grid_width: f32,
    pub padding_x: f32,
    pub padding_y: f32,
}

impl TableStyle {
    /// Tables copied out of a Word document.
    pub fn document() -> Self {
        Self {
            header_font: Font::Bold,
            header_size: 14.0,
            header_background: Color::GREY,
            header_text: Color::WHITESMOKE,
            header_bottom_padding: 12.0,
            body_font: Font::Regular,
            body_size: 10.0,
            body_background: Color::BEIGE,
            body_text: Color::BLACK,
            grid: Color::BLACK,
            grid_width: 1.0,
            padding_x: 6.0,
            padding_y: 3.0,
        }
    }

    /// Full spreadsheet grids, set smaller.
    pub fn spreadsheet() -> Self {
        Self {
            header_size: 10.0,
            body_size: 8.0,
            ..Self::document()
        }
    }

    fn row_font(&self, header: bool) -> (Font, f32, Color) {
        if header {
            (self.header_font, self.header_size, self.header_text)
        } else {
            (self.body_font, self.body_size, self.body_text)
        }
    }

    fn row_height(&self, header: bool) -> f32 {
        if header {
            self.header_size * 1.2 + self.padding_y + self.header_bottom_padding
        } else {
            self.body_size * 1.2 + 2.0 * self.padding_y
        }
    }
}

/// Uncompressed 8-bit RGB pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RawImage {
    /// Wrap RGB pixel data; `pixels` must hold exactly `width * height * 3` bytes.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(PdfError::ImageData {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Builds a PDF document by flowing content down the page.
pub struct PdfBuilder {
    setup: PageSetup,
    document: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    page_ids: Vec<ObjectId>,
    images: Vec<(String, ObjectId)>,
    /// Operations of the open page, if any.
    page: Option<Vec<Operation>>,
    /// Distance from the top edge of the page to the next free line.
    cursor: f32,
}

impl PdfBuilder {
    /// Start an empty document.
    pub fn new(setup: PageSetup) -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        let resources_id = document.new_object_id();

        Self {
            setup,
            document,
            pages_id,
            resources_id,
            page_ids: Vec::new(),
            images: Vec::new(),
            page: None,
            cursor: setup.margin,
        }
    }

    /// Page geometry of this document.
    pub fn setup(&self) -> PageSetup {
        self.setup
    }

    /// Number of pages started so far.
    pub fn page_count(&self) -> usize {
        self.page_ids.len() + usize::from(self.page.is_some())
    }

    /// Add a paragraph, wrapped to the frame width.
    ///
    /// Whitespace runs, including line breaks, collapse to single spaces.
    pub fn paragraph(&mut self, text: &str, style: &ParagraphStyle) -> Result<()> {
        let frame_width = self.setup.frame_width();

        for line in wrap_text(text, style.font, style.size, frame_width) {
            self.ensure_space(style.leading)?;

            let line_width = text_width(&line, style.font, style.size);
            let x = match style.align {
                Align::Left => self.setup.margin,
                Align::Center => self.setup.margin + (frame_width - line_width).max(0.0) / 2.0,
            };
            let baseline = self.setup.height - (self.cursor + style.size);

            self.draw_text(&line, style.font, style.size, style.color, x, baseline);
            self.cursor += style.leading;
        }

        Ok(())
    }

    /// Add vertical space.
    pub fn spacer(&mut self, height: f32) {
        if self.page.is_some() {
            self.cursor += height;
        }
    }

    /// End the current page; the next content starts on a fresh one.
    pub fn page_break(&mut self) -> Result<()> {
        if self.page.is_none() {
            self.start_page();
        }
        self.finish_page()
    }

    /// Add a table. The first row is styled as the header.
    ///
    /// Columns get their natural width and are scaled down together when
    /// the table is wider than the frame; cell text that still does not fit
    /// is truncated. Rows that run past the bottom margin continue on the
    /// next page.
    pub fn table(&mut self, rows: &[Vec<String>], style: &TableStyle) -> Result<()> {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return Ok(());
        }

        let widths = self.column_widths(rows, columns, style);
        let table_width: f32 = widths.iter().sum();
        let left = self.setup.margin + (self.setup.frame_width() - table_width).max(0.0) / 2.0;

        for (index, row) in rows.iter().enumerate() {
            let header = index == 0;
            let height = style.row_height(header);
            self.ensure_space(height)?;

            let (font, size, text_color) = style.row_font(header);
            let background = if header {
                style.header_background
            } else {
                style.body_background
            };
            let bottom = self.setup.height - (self.cursor + height);

            let ops = self.ops();
            ops.push(Operation::new("rg", background.operands()));
            ops.push(Operation::new(
                "re",
                vec![left.into(), bottom.into(), table_width.into(), height.into()],
            ));
            ops.push(Operation::new("f", vec![]));

            ops.push(Operation::new("w", vec![style.grid_width.into()]));
            ops.push(Operation::new("RG", style.grid.operands()));
            let mut x = left;
            for width in &widths {
                ops.push(Operation::new(
                    "re",
                    vec![x.into(), bottom.into(), (*width).into(), height.into()],
                ));
                x += width;
            }
            ops.push(Operation::new("S", vec![]));

            let baseline = self.setup.height - (self.cursor + style.padding_y + size);
            let mut x = left;
            for (column, width) in widths.iter().enumerate() {
                let cell = row.get(column).map(String::as_str).unwrap_or("");
                let available = (width - 2.0 * style.padding_x).max(0.0);
                let text = truncate_to_width(cell, font, size, available);
                if text != cell {
                    log::warn!("Truncated table cell '{}' to fit its column", cell);
                }
                if !text.is_empty() {
                    let text_x = x + (width - text_width(&text, font, size)) / 2.0;
                    self.draw_text(&text, font, size, text_color, text_x, baseline);
                }
                x += width;
            }

            self.cursor += height;
        }

        Ok(())
    }

    /// Add an image drawn at `width` x `height` points, centred horizontally.
    pub fn image(&mut self, image: &RawImage, width: f32, height: f32) -> Result<()> {
        self.ensure_space(height)?;

        let name = format!("Im{}", self.images.len() + 1);
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width as i64,
                "Height" => image.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8i64,
            },
            image.pixels.clone(),
        );
        let image_id = self.document.add_object(stream);
        self.images.push((name.clone(), image_id));

        let x = self.setup.margin + (self.setup.frame_width() - width).max(0.0) / 2.0;
        let y = self.setup.height - (self.cursor + height);

        let ops = self.ops();
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new(
            "cm",
            vec![
                width.into(),
                Object::Integer(0),
                Object::Integer(0),
                height.into(),
                x.into(),
                y.into(),
            ],
        ));
        ops.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
        ops.push(Operation::new("Q", vec![]));

        self.cursor += height;
        Ok(())
    }

    /// Close the document and serialize it.
    ///
    /// A document with no content still gets one blank page.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        if self.page.is_some() || self.page_ids.is_empty() {
            if self.page.is_none() {
                self.start_page();
            }
            self.finish_page()?;
        }

        let mut fonts = Dictionary::new();
        for font in [Font::Regular, Font::Bold] {
            let font_id = self.document.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), font_id);
        }

        let mut resources = dictionary! { "Font" => fonts };
        if !self.images.is_empty() {
            let mut xobjects = Dictionary::new();
            for (name, id) in &self.images {
                xobjects.set(name.as_str(), *id);
            }
            resources.set("XObject", xobjects);
        }
        self.document
            .objects
            .insert(self.resources_id, Object::Dictionary(resources));

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::Reference(*id)).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.document
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.document.trailer.set("Root", catalog_id);

        self.document.compress();

        let mut buffer = Vec::new();
        self.document.save_to(&mut buffer)?;
        Ok(buffer)
    }

    fn column_widths(&self, rows: &[Vec<String>], columns: usize, style: &TableStyle) -> Vec<f32> {
        let mut widths = vec![2.0 * style.padding_x; columns];

        for (index, row) in rows.iter().enumerate() {
            let (font, size, _) = style.row_font(index == 0);
            for (column, cell) in row.iter().enumerate() {
                let natural = text_width(cell, font, size) + 2.0 * style.padding_x;
                widths[column] = widths[column].max(natural);
            }
        }

        let total: f32 = widths.iter().sum();
        let frame_width = self.setup.frame_width();
        if total > frame_width {
            let scale = frame_width / total;
            for width in &mut widths {
                *width *= scale;
            }
        }
        widths
    }

    fn draw_text(&mut self, text: &str, font: Font, size: f32, color: Color, x: f32, y: f32) {
        let ops = self.ops();
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![Object::Name(font.resource_name().as_bytes().to_vec()), size.into()],
        ));
        ops.push(Operation::new("rg", color.operands()));
        ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(to_win_ansi(text), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    /// Make sure `height` points fit below the cursor, breaking the page if not.
    fn ensure_space(&mut self, height: f32) -> Result<()> {
        if self.page.is_none() {
            self.start_page();
            return Ok(());
        }

        let bottom = self.setup.height - self.setup.margin;
        let at_top = self.cursor <= self.setup.margin;
        if self.cursor + height > bottom && !at_top {
            self.finish_page()?;
            self.start_page();
        }
        Ok(())
    }

    fn ops(&mut self) -> &mut Vec<Operation> {
        if self.page.is_none() {
            self.start_page();
        }
        self.page.get_or_insert_with(Vec::new)
    }

    fn start_page(&mut self) {
        self.page = Some(Vec::new());
        self.cursor = self.setup.margin;
    }

    fn finish_page(&mut self) -> Result<()> {
        let operations = self.page.take().unwrap_or_default();
        let content = Content { operations }.encode()?;
        let content_id = self
            .document
            .add_object(Stream::new(Dictionary::new(), content));

        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                self.setup.width.into(),
                self.setup.height.into(),
            ],
            "Contents" => content_id,
            "Resources" => self.resources_id,
        });
        self.page_ids.push(page_id);
        self.cursor = self.setup.margin;
        Ok(())
    }
}

/// Greedy word wrap. Words wider than `max_width` are broken between
/// characters.
pub fn wrap_text(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if text_width(&candidate, font, size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width(word, font, size) <= max_width {
            current = word.to_string();
            continue;
        }

        for c in word.chars() {
            current.push(c);
            if text_width(&current, font, size) > max_width && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(c);
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
