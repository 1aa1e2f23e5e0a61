//! Minimal PresentationML writer.
//!
//! Builds an in-memory slide model and serializes it into an OPC package
//! (a zip of XML parts) that PowerPoint, Keynote and LibreOffice open. Only
//! what the deck builder needs is modelled: text boxes and raster pictures on
//! blank slides. Images are taken as byte buffers, so writing a deck never
//! touches the filesystem.

use crate::core::layout::{inches_milli, Frame};
use crate::utils::error::{DeckError, Result};
use image::{ImageFormat, ImageReader};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::io::{Cursor, Write};
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

pub const PPTX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// 4:3 slide, 10in x 7.5in.
pub const SLIDE_WIDTH: i64 = inches_milli(10_000);
pub const SLIDE_HEIGHT: i64 = inches_milli(7_500);

const NS_MAIN: [(&str, &str); 3] = [
    ("xmlns:a", "http://schemas.openxmlformats.org/drawingml/2006/main"),
    (
        "xmlns:r",
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships",
    ),
    (
        "xmlns:p",
        "http://schemas.openxmlformats.org/presentationml/2006/main",
    ),
];
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CREATOR: &str = "icon-deck";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
}

impl ImageKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpeg",
            ImageKind::Gif => "gif",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Gif => "image/gif",
        }
    }
}

/// A raster image that has been sniffed and measured and can go into a slide.
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    kind: ImageKind,
    bytes: Vec<u8>,
}

impl EmbeddedImage {
    /// 只接受能解析出尺寸的 PNG/JPEG/GIF，其餘 (包含 SVG、HTML 錯誤頁) 都視為嵌入失敗
    pub fn decode(bytes: Vec<u8>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(DeckError::ProcessingError {
                message: "image payload is empty".to_string(),
            });
        }

        let reader = ImageReader::new(Cursor::new(bytes.as_slice())).with_guessed_format()?;
        let kind = match reader.format() {
            Some(ImageFormat::Png) => ImageKind::Png,
            Some(ImageFormat::Jpeg) => ImageKind::Jpeg,
            Some(ImageFormat::Gif) => ImageKind::Gif,
            Some(other) => {
                return Err(DeckError::UnsupportedImageFormat {
                    format: format!("{:?}", other),
                })
            }
            None => {
                return Err(DeckError::UnsupportedImageFormat {
                    format: "unknown".to_string(),
                })
            }
        };
        // 讀得出尺寸才算是完整的圖檔
        reader.into_dimensions()?;

        Ok(Self { kind, bytes })
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
}

impl Alignment {
    fn as_attr(&self) -> &'static str {
        match self {
            Alignment::Left => "l",
            Alignment::Center => "ctr",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub frame: Frame,
    pub text: String,
    /// Hundredths of a point, as PresentationML stores it.
    pub font_size: Option<u32>,
    pub bold: bool,
    pub alignment: Alignment,
}

impl TextBox {
    pub fn new(frame: Frame, text: impl Into<String>) -> Self {
        Self {
            frame,
            text: text.into(),
            font_size: None,
            bold: false,
            alignment: Alignment::Left,
        }
    }

    pub fn font_size(mut self, hundredths_pt: u32) -> Self {
        self.font_size = Some(hundredths_pt);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn centered(mut self) -> Self {
        self.alignment = Alignment::Center;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Picture {
    pub frame: Frame,
    pub description: String,
    pub image: EmbeddedImage,
}

#[derive(Debug, Clone)]
pub enum Shape {
    Text(TextBox),
    Picture(Picture),
}

#[derive(Debug, Clone, Default)]
pub struct Slide {
    shapes: Vec<Shape>,
}

impl Slide {
    pub fn add_text_box(&mut self, text_box: TextBox) {
        self.shapes.push(Shape::Text(text_box));
    }

    pub fn add_picture(&mut self, frame: Frame, description: &str, image: EmbeddedImage) {
        self.shapes.push(Shape::Picture(Picture {
            frame,
            description: description.to_string(),
            image,
        }));
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn pictures(&self) -> impl Iterator<Item = &Picture> {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Picture(picture) => Some(picture),
            Shape::Text(_) => None,
        })
    }

    pub fn text_boxes(&self) -> impl Iterator<Item = &TextBox> {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Text(text) => Some(text),
            Shape::Picture(_) => None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Presentation {
    title: String,
    slides: Vec<Slide>,
}

impl Presentation {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slides: Vec::new(),
        }
    }

    /// 新增一張空白版面的投影片
    pub fn add_slide(&mut self) -> &mut Slide {
        self.slides.push(Slide::default());
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Serializes the deck into `.pptx` bytes.
    pub fn to_pptx(&self) -> Result<Vec<u8>> {
        let mut package = PackageWriter::new();

        package.part("[Content_Types].xml", &self.content_types_xml()?)?;
        package.part("_rels/.rels", &root_rels_xml()?)?;
        package.part("docProps/core.xml", &self.core_props_xml()?)?;
        package.part("docProps/app.xml", &self.app_props_xml()?)?;
        package.part("ppt/presentation.xml", &self.presentation_xml()?)?;
        package.part(
            "ppt/_rels/presentation.xml.rels",
            &self.presentation_rels_xml()?,
        )?;
        package.part("ppt/slideMasters/slideMaster1.xml", &slide_master_xml()?)?;
        package.part(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &slide_master_rels_xml()?,
        )?;
        package.part("ppt/slideLayouts/slideLayout1.xml", &slide_layout_xml()?)?;
        package.part(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &slide_layout_rels_xml()?,
        )?;
        package.part("ppt/theme/theme1.xml", THEME_XML.as_bytes())?;

        let mut next_image = 1;
        for (index, slide) in self.slides.iter().enumerate() {
            let number = index + 1;
            let mut media = Vec::new();

            for picture in slide.pictures() {
                let file_name = format!("image{}.{}", next_image, picture.image.kind().extension());
                package.part(&format!("ppt/media/{}", file_name), picture.image.bytes())?;
                media.push(file_name);
                next_image += 1;
            }

            package.part(&format!("ppt/slides/slide{}.xml", number), &slide_xml(slide)?)?;
            package.part(
                &format!("ppt/slides/_rels/slide{}.xml.rels", number),
                &slide_rels_xml(&media)?,
            )?;
        }

        let bytes = package.finish()?;
        tracing::debug!(
            "Serialized presentation with {} slide(s) into {} bytes",
            self.slides.len(),
            bytes.len()
        );
        Ok(bytes)
    }

    fn content_types_xml(&self) -> Result<Vec<u8>> {
        let mut xml = XmlPart::new()?;
        xml.open("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
        xml.empty(
            "Default",
            &[
                ("Extension", "rels"),
                (
                    "ContentType",
                    "application/vnd.openxmlformats-package.relationships+xml",
                ),
            ],
        )?;
        xml.empty(
            "Default",
            &[("Extension", "xml"), ("ContentType", "application/xml")],
        )?;
        for kind in [ImageKind::Png, ImageKind::Jpeg, ImageKind::Gif] {
            xml.empty(
                "Default",
                &[
                    ("Extension", kind.extension()),
                    ("ContentType", kind.content_type()),
                ],
            )?;
        }

        let mut overrides = vec![
            (
                "/ppt/presentation.xml".to_string(),
                "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml",
            ),
            (
                "/ppt/slideMasters/slideMaster1.xml".to_string(),
                "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml",
            ),
            (
                "/ppt/slideLayouts/slideLayout1.xml".to_string(),
                "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml",
            ),
        ];
        for number in 1..=self.slides.len() {
            overrides.push((
                format!("/ppt/slides/slide{}.xml", number),
                "application/vnd.openxmlformats-officedocument.presentationml.slide+xml",
            ));
        }
        overrides.push((
            "/ppt/theme/theme1.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.theme+xml",
        ));
        overrides.push((
            "/docProps/core.xml".to_string(),
            "application/vnd.openxmlformats-package.core-properties+xml",
        ));
        overrides.push((
            "/docProps/app.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.extended-properties+xml",
        ));

        for (part_name, content_type) in &overrides {
            xml.empty(
                "Override",
                &[("PartName", part_name.as_str()), ("ContentType", *content_type)],
            )?;
        }

        xml.close("Types")?;
        Ok(xml.finish())
    }

    fn core_props_xml(&self) -> Result<Vec<u8>> {
        let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let timestamp = [("xsi:type", "dcterms:W3CDTF")];

        let mut xml = XmlPart::new()?;
        xml.open(
            "cp:coreProperties",
            &[
                (
                    "xmlns:cp",
                    "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
                ),
                ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
                ("xmlns:dcterms", "http://purl.org/dc/terms/"),
                ("xmlns:dcmitype", "http://purl.org/dc/dcmitype/"),
                ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
            ],
        )?;
        xml.text_element("dc:title", &[], &self.title)?;
        xml.text_element("dc:creator", &[], CREATOR)?;
        xml.text_element("cp:lastModifiedBy", &[], CREATOR)?;
        xml.text_element("cp:revision", &[], "1")?;
        xml.text_element("dcterms:created", &timestamp, &now)?;
        xml.text_element("dcterms:modified", &timestamp, &now)?;
        xml.close("cp:coreProperties")?;
        Ok(xml.finish())
    }

    fn app_props_xml(&self) -> Result<Vec<u8>> {
        let mut xml = XmlPart::new()?;
        xml.open(
            "Properties",
            &[
                (
                    "xmlns",
                    "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
                ),
                (
                    "xmlns:vt",
                    "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes",
                ),
            ],
        )?;
        xml.text_element("Application", &[], CREATOR)?;
        xml.text_element("PresentationFormat", &[], "On-screen Show (4:3)")?;
        xml.text_element("Slides", &[], &self.slides.len().to_string())?;
        xml.close("Properties")?;
        Ok(xml.finish())
    }

    fn presentation_xml(&self) -> Result<Vec<u8>> {
        let mut root = NS_MAIN.to_vec();
        root.push(("saveSubsetFonts", "1"));

        let mut xml = XmlPart::new()?;
        xml.open("p:presentation", &root)?;
        xml.open("p:sldMasterIdLst", &[])?;
        xml.empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?;
        xml.close("p:sldMasterIdLst")?;

        if !self.slides.is_empty() {
            xml.open("p:sldIdLst", &[])?;
            for index in 0..self.slides.len() {
                let id = (256 + index).to_string();
                let rel = format!("rId{}", index + 2);
                xml.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel.as_str())])?;
            }
            xml.close("p:sldIdLst")?;
        }

        let width = SLIDE_WIDTH.to_string();
        let height = SLIDE_HEIGHT.to_string();
        xml.empty(
            "p:sldSz",
            &[
                ("cx", width.as_str()),
                ("cy", height.as_str()),
                ("type", "screen4x3"),
            ],
        )?;
        xml.empty("p:notesSz", &[("cx", height.as_str()), ("cy", width.as_str())])?;
        xml.close("p:presentation")?;
        Ok(xml.finish())
    }

    /// rId1 是母片，投影片從 rId2 開始，佈景主題排最後
    fn presentation_rels_xml(&self) -> Result<Vec<u8>> {
        let mut rels = vec![Relationship::new(
            1,
            "slideMaster",
            "slideMasters/slideMaster1.xml",
        )];
        for index in 0..self.slides.len() {
            rels.push(Relationship::new(
                index + 2,
                "slide",
                format!("slides/slide{}.xml", index + 1),
            ));
        }
        rels.push(Relationship::new(
            self.slides.len() + 2,
            "theme",
            "theme/theme1.xml",
        ));
        relationships_xml(&rels)
    }
}

struct PackageWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl PackageWriter {
    fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    fn part(&mut self, name: &str, data: &[u8]) -> Result<()> {
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(data)?;
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.zip.finish()?;
        Ok(cursor.into_inner())
    }
}

/// 單一 XML 部件；文字與屬性值都經過 [`xml_safe`] 再交給 quick-xml 跳脫
struct XmlPart {
    writer: Writer<Vec<u8>>,
}

impl XmlPart {
    fn new() -> Result<Self> {
        let mut part = Self {
            writer: Writer::new(Vec::new()),
        };
        part.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(part)
    }

    fn open(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        self.write(Event::Start(element(name, attributes)))
    }

    fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        self.write(Event::Empty(element(name, attributes)))
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn text(&mut self, text: &str) -> Result<()> {
        let safe = xml_safe(text);
        self.write(Event::Text(BytesText::new(safe.as_ref())))
    }

    fn text_element(&mut self, name: &str, attributes: &[(&str, &str)], text: &str) -> Result<()> {
        self.open(name, attributes)?;
        self.text(text)?;
        self.close(name)
    }

    /// 固定的標記片段，原樣寫入
    fn markup(&mut self, fragment: &str) -> Result<()> {
        self.write(Event::Text(BytesText::from_escaped(fragment)))
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| DeckError::ProcessingError {
                message: format!("Failed to write XML part: {}", e),
            })
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

fn element<'a>(name: &'a str, attributes: &[(&str, &str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for (key, value) in attributes {
        let value = xml_safe(value);
        start.push_attribute((*key, value.as_ref()));
    }
    start
}

/// 將 XML 1.0 不允許的字元改寫成 `_xHHHH_`，PowerPoint 讀取時會還原
pub fn xml_safe(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_forbidden_xml_char) {
        return Cow::Borrowed(text);
    }

    let mut safe = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if is_forbidden_xml_char(c) {
            safe.push_str(&format!("_x{:04X}_", c as u32));
        } else {
            safe.push(c);
        }
    }
    Cow::Owned(safe)
}

fn is_forbidden_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}'
    )
}

struct Relationship {
    id: usize,
    kind: String,
    target: String,
}

impl Relationship {
    fn new(id: usize, kind: &str, target: impl Into<String>) -> Self {
        Self {
            id,
            kind: format!("{}/{}", REL_BASE, kind),
            target: target.into(),
        }
    }

    fn with_type(id: usize, kind: &str, target: &str) -> Self {
        Self {
            id,
            kind: kind.to_string(),
            target: target.to_string(),
        }
    }
}

fn relationships_xml(rels: &[Relationship]) -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.open("Relationships", &[("xmlns", NS_RELATIONSHIPS)])?;
    for rel in rels {
        let id = format!("rId{}", rel.id);
        xml.empty(
            "Relationship",
            &[
                ("Id", id.as_str()),
                ("Type", rel.kind.as_str()),
                ("Target", rel.target.as_str()),
            ],
        )?;
    }
    xml.close("Relationships")?;
    Ok(xml.finish())
}

fn root_rels_xml() -> Result<Vec<u8>> {
    relationships_xml(&[
        Relationship::new(1, "officeDocument", "ppt/presentation.xml"),
        Relationship::with_type(
            2,
            "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties",
            "docProps/core.xml",
        ),
        Relationship::new(3, "extended-properties", "docProps/app.xml"),
    ])
}

fn slide_master_rels_xml() -> Result<Vec<u8>> {
    relationships_xml(&[
        Relationship::new(1, "slideLayout", "../slideLayouts/slideLayout1.xml"),
        Relationship::new(2, "theme", "../theme/theme1.xml"),
    ])
}

fn slide_layout_rels_xml() -> Result<Vec<u8>> {
    relationships_xml(&[Relationship::new(
        1,
        "slideMaster",
        "../slideMasters/slideMaster1.xml",
    )])
}

/// rId1 指向版面配置，圖片依序從 rId2 開始
fn slide_rels_xml(media: &[String]) -> Result<Vec<u8>> {
    let mut rels = vec![Relationship::new(
        1,
        "slideLayout",
        "../slideLayouts/slideLayout1.xml",
    )];
    for (index, file_name) in media.iter().enumerate() {
        rels.push(Relationship::new(
            index + 2,
            "image",
            format!("../media/{}", file_name),
        ));
    }
    relationships_xml(&rels)
}

const EMPTY_SHAPE_TREE: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

const MASTER_BODY: &str = r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst><p:txStyles><p:titleStyle/><p:bodyStyle/><p:otherStyle/></p:txStyles>"#;

const MASTER_COLOR_MAPPING: &str = "<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>";

fn slide_master_xml() -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.open("p:sldMaster", &NS_MAIN)?;
    xml.open("p:cSld", &[])?;
    xml.markup(r#"<p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#)?;
    xml.open("p:spTree", &[])?;
    xml.markup(EMPTY_SHAPE_TREE)?;
    xml.close("p:spTree")?;
    xml.close("p:cSld")?;
    xml.markup(MASTER_BODY)?;
    xml.close("p:sldMaster")?;
    Ok(xml.finish())
}

fn slide_layout_xml() -> Result<Vec<u8>> {
    let mut root = NS_MAIN.to_vec();
    root.extend([("type", "blank"), ("preserve", "1")]);

    let mut xml = XmlPart::new()?;
    xml.open("p:sldLayout", &root)?;
    xml.open("p:cSld", &[("name", "Blank")])?;
    xml.open("p:spTree", &[])?;
    xml.markup(EMPTY_SHAPE_TREE)?;
    xml.close("p:spTree")?;
    xml.close("p:cSld")?;
    xml.markup(MASTER_COLOR_MAPPING)?;
    xml.close("p:sldLayout")?;
    Ok(xml.finish())
}

fn slide_xml(slide: &Slide) -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.open("p:sld", &NS_MAIN)?;
    xml.open("p:cSld", &[])?;
    xml.open("p:spTree", &[])?;
    xml.markup(EMPTY_SHAPE_TREE)?;

    // 形狀 id 從 2 開始，1 是 spTree 本身
    let mut next_embed = 2;
    for (index, shape) in slide.shapes().iter().enumerate() {
        let id = index + 2;
        match shape {
            Shape::Text(text) => write_text_box(&mut xml, id, text)?,
            Shape::Picture(picture) => {
                write_picture(&mut xml, id, next_embed, picture)?;
                next_embed += 1;
            }
        }
    }

    xml.close("p:spTree")?;
    xml.close("p:cSld")?;
    xml.markup(MASTER_COLOR_MAPPING)?;
    xml.close("p:sld")?;
    Ok(xml.finish())
}

fn write_transform(xml: &mut XmlPart, frame: Frame) -> Result<()> {
    let (x, y) = (frame.x.to_string(), frame.y.to_string());
    let (cx, cy) = (frame.width.to_string(), frame.height.to_string());

    xml.open("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", x.as_str()), ("y", y.as_str())])?;
    xml.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    xml.close("a:xfrm")
}

fn write_text_box(xml: &mut XmlPart, id: usize, text: &TextBox) -> Result<()> {
    let shape_id = id.to_string();
    let name = format!("TextBox {}", id - 1);

    xml.open("p:sp", &[])?;
    xml.open("p:nvSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", shape_id.as_str()), ("name", name.as_str())])?;
    xml.empty("p:cNvSpPr", &[("txBox", "1")])?;
    xml.empty("p:nvPr", &[])?;
    xml.close("p:nvSpPr")?;

    xml.open("p:spPr", &[])?;
    write_transform(xml, text.frame)?;
    xml.markup(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/>"#)?;
    xml.close("p:spPr")?;

    xml.open("p:txBody", &[])?;
    xml.markup(r#"<a:bodyPr wrap="none"><a:spAutoFit/></a:bodyPr><a:lstStyle/>"#)?;
    xml.open("a:p", &[])?;
    xml.empty("a:pPr", &[("algn", text.alignment.as_attr())])?;
    xml.open("a:r", &[])?;

    let size = text.font_size.map(|size| size.to_string());
    let mut run_props = vec![("lang", "en-US"), ("dirty", "0")];
    if let Some(size) = size.as_deref() {
        run_props.push(("sz", size));
    }
    if text.bold {
        run_props.push(("b", "1"));
    }
    xml.empty("a:rPr", &run_props)?;
    xml.text_element("a:t", &[], &text.text)?;

    xml.close("a:r")?;
    xml.close("a:p")?;
    xml.close("p:txBody")?;
    xml.close("p:sp")
}

fn write_picture(xml: &mut XmlPart, id: usize, embed: usize, picture: &Picture) -> Result<()> {
    let shape_id = id.to_string();
    let name = format!("Picture {}", id - 1);
    let rel = format!("rId{}", embed);

    xml.open("p:pic", &[])?;
    xml.open("p:nvPicPr", &[])?;
    xml.empty(
        "p:cNvPr",
        &[
            ("id", shape_id.as_str()),
            ("name", name.as_str()),
            ("descr", picture.description.as_str()),
        ],
    )?;
    xml.markup(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/>"#)?;
    xml.close("p:nvPicPr")?;

    xml.open("p:blipFill", &[])?;
    xml.empty("a:blip", &[("r:embed", rel.as_str())])?;
    xml.markup("<a:stretch><a:fillRect/></a:stretch>")?;
    xml.close("p:blipFill")?;

    xml.open("p:spPr", &[])?;
    write_transform(xml, picture.frame)?;
    xml.markup(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#)?;
    xml.close("p:spPr")?;
    xml.close("p:pic")
}

const THEME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme"><a:themeElements><a:clrScheme name="Office"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F497D"/></a:dk2><a:lt2><a:srgbClr val="EEECE1"/></a:lt2><a:accent1><a:srgbClr val="4F81BD"/></a:accent1><a:accent2><a:srgbClr val="C0504D"/></a:accent2><a:accent3><a:srgbClr val="9BBB59"/></a:accent3><a:accent4><a:srgbClr val="8064A2"/></a:accent4><a:accent5><a:srgbClr val="4BACC6"/></a:accent5><a:accent6><a:srgbClr val="F79646"/></a:accent6><a:hlink><a:srgbClr val="0000FF"/></a:hlink><a:folHlink><a:srgbClr val="800080"/></a:folHlink></a:clrScheme><a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Office"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="25400"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="38100"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::new(width, height);
        let mut cursor = Cursor::new(Vec::new());
        image.write_to(&mut cursor, ImageFormat::Png).unwrap();
        cursor.into_inner()
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    fn part_names(bytes: &[u8]) -> Vec<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    /// 每個 XML 部件都要能完整解析，且不含 XML 1.0 禁用字元
    fn assert_well_formed(name: &str, xml: &str) {
        assert!(
            !xml.chars().any(is_forbidden_xml_char),
            "{} carries a forbidden character",
            name
        );

        let mut reader = quick_xml::Reader::from_str(xml);
        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => panic!("{} is not well-formed: {}", name, e),
            }
        }
    }

    #[test]
    fn test_decode_png() {
        let image = EmbeddedImage::decode(png_bytes(8, 4)).unwrap();

        assert_eq!(image.kind(), ImageKind::Png);
        assert!(!image.bytes().is_empty());
    }

    #[test]
    fn test_xml_safe_encodes_control_characters() {
        assert_eq!(xml_safe("home"), Cow::Borrowed("home"));
        assert_eq!(xml_safe("a\u{1}b"), "a_x0001_b");
        assert_eq!(xml_safe("tab\there\nline"), "tab\there\nline");
        assert_eq!(xml_safe("\u{0}\u{1F}\u{FFFF}"), "_x0000__x001F__xFFFF_");
    }

    #[test]
    fn test_control_characters_keep_every_part_well_formed() {
        let mut presentation = Presentation::new("deck\u{7}");
        let slide = presentation.add_slide();
        slide.add_text_box(TextBox::new(Frame::new(0, 0, 1, 1), "a\u{1}b"));
        slide.add_text_box(TextBox::new(Frame::new(0, 0, 1, 1), r#"R&D "x" <y>"#));
        let image = EmbeddedImage::decode(png_bytes(2, 2)).unwrap();
        slide.add_picture(Frame::new(0, 0, 1, 1), "pic\u{1B}\"quoted\"", image);

        let bytes = presentation.to_pptx().unwrap();

        for name in part_names(&bytes) {
            if name.ends_with(".xml") || name.ends_with(".rels") {
                assert_well_formed(&name, &read_part(&bytes, &name));
            }
        }

        let slide_xml = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide_xml.contains("<a:t>a_x0001_b</a:t>"));
        assert!(slide_xml.contains(r#"descr="pic_x001B_&quot;quoted&quot;""#));
        assert!(read_part(&bytes, "docProps/core.xml").contains("<dc:title>deck_x0007_</dc:title>"));
    }

    #[test]
    fn test_decode_rejects_svg_and_garbage() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16"></svg>"#;
        assert!(EmbeddedImage::decode(svg.to_vec()).is_err());
        assert!(EmbeddedImage::decode(b"<html>502 Bad Gateway</html>".to_vec()).is_err());
        assert!(EmbeddedImage::decode(Vec::new()).is_err());
    }

    #[test]
    fn test_package_contains_required_parts() {
        let mut presentation = Presentation::new("Deck");
        presentation.add_slide();

        let bytes = presentation.to_pptx().unwrap();
        let names = part_names(&bytes);

        for required in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "docProps/app.xml",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/_rels/slide1.xml.rels",
        ] {
            assert!(names.contains(&required.to_string()), "missing {}", required);
        }
    }

    #[test]
    fn test_pictures_are_stored_as_media_and_related() {
        let mut presentation = Presentation::new("Deck");
        let slide = presentation.add_slide();
        slide.add_text_box(TextBox::new(Frame::new(0, 0, 100, 100), "Title").bold());
        let image = EmbeddedImage::decode(png_bytes(2, 2)).unwrap();
        slide.add_picture(Frame::new(10, 20, 30, 40), "home", image);

        let bytes = presentation.to_pptx().unwrap();

        assert!(part_names(&bytes).contains(&"ppt/media/image1.png".to_string()));

        let rels = read_part(&bytes, "ppt/slides/_rels/slide1.xml.rels");
        assert!(rels.contains(r#"Id="rId2""#));
        assert!(rels.contains("../media/image1.png"));

        let slide_xml = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide_xml.contains(r#"r:embed="rId2""#));
        assert!(slide_xml.contains(r#"<a:off x="10" y="20"/><a:ext cx="30" cy="40"/>"#));
        assert!(slide_xml.contains(r#"<p:cNvPr id="3" name="Picture 2" descr="home"/>"#));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut presentation = Presentation::new("R&D <icons>");
        presentation
            .add_slide()
            .add_text_box(TextBox::new(Frame::new(0, 0, 1, 1), "a<b & c>d").centered());

        let bytes = presentation.to_pptx().unwrap();

        let slide_xml = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide_xml.contains("<a:t>a&lt;b &amp; c&gt;d</a:t>"));
        assert!(slide_xml.contains(r#"<a:pPr algn="ctr"/>"#));

        let core = read_part(&bytes, "docProps/core.xml");
        assert!(core.contains("<dc:title>R&amp;D &lt;icons&gt;</dc:title>"));
    }

    #[test]
    fn test_presentation_declares_slide_size() {
        let mut presentation = Presentation::new("Deck");
        presentation.add_slide();

        let bytes = presentation.to_pptx().unwrap();
        let xml = read_part(&bytes, "ppt/presentation.xml");

        assert!(xml.contains(r#"<p:sldSz cx="9144000" cy="6858000" type="screen4x3"/>"#));
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId2"/>"#));

        let rels = read_part(&bytes, "ppt/_rels/presentation.xml.rels");
        assert!(rels.contains(r#"Id="rId3""#));
        assert!(rels.contains("theme/theme1.xml"));
    }
}
