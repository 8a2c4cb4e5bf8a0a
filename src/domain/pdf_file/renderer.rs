//! PDFレンダラーの抽象と、`lopdf` による実装。
//!
//! ページごとに異なる用紙サイズを持てるよう、ページツリーを直接組み立てる。

use super::create_pdf::PdfValidationError;
use super::page_format::{PageFormat, PX_TO_PT};
use crate::domain::raster::RasterString;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::DynamicImage;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::io::Write;

/// レンダラーの生成器。ライブラリ読み込みの結果として渡される。
pub trait RendererFactory {
    fn name(&self) -> &str;

    /// 最初のページを持つ新しい文書を作る。
    fn create(&self, first_page: PageFormat) -> Box<dyn DocumentRenderer>;
}

/// 組み立て中の文書。
pub trait DocumentRenderer {
    /// 末尾にページを追加する。以降の `add_image` はこのページに描かれる。
    fn add_page(&mut self, format: PageFormat);

    /// 現在のページに画像を置く。座標と大きさは px、原点は左上。
    fn add_image(
        &mut self,
        raster: &RasterString,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), PdfValidationError>;

    fn pages(&self) -> Vec<PageFormat>;

    /// 文書を確定し、PDFのバイト列を返す。
    fn output(self: Box<Self>, title: &str) -> Result<Vec<u8>, PdfValidationError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfFactory;

impl RendererFactory for LopdfFactory {
    fn name(&self) -> &str {
        "lopdf"
    }

    fn create(&self, first_page: PageFormat) -> Box<dyn DocumentRenderer> {
        Box::new(LopdfRenderer::new(first_page))
    }
}

struct PendingPage {
    format: PageFormat,
    operations: Vec<Operation>,
    xobjects: Dictionary,
}

impl PendingPage {
    fn new(format: PageFormat) -> Self {
        Self {
            format,
            operations: Vec::new(),
            xobjects: Dictionary::new(),
        }
    }
}

pub struct LopdfRenderer {
    doc: Document,
    pages: Vec<PendingPage>,
    image_count: usize,
}

impl LopdfRenderer {
    pub fn new(first_page: PageFormat) -> Self {
        Self {
            doc: Document::with_version("1.7"),
            pages: vec![PendingPage::new(first_page)],
            image_count: 0,
        }
    }
}

impl DocumentRenderer for LopdfRenderer {
    fn add_page(&mut self, format: PageFormat) {
        self.pages.push(PendingPage::new(format));
    }

    fn add_image(
        &mut self,
        raster: &RasterString,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), PdfValidationError> {
        let image = raster
            .decode()
            .map_err(|e| PdfValidationError::PdfCreationError(e.to_string()))?;
        let xobject = image_xobject(&mut self.doc, &image)?;

        self.image_count += 1;
        let name = format!("Im{}", self.image_count);

        // `pages` は常に1ページ以上ある
        let Some(page) = self.pages.last_mut() else {
            return Err(PdfValidationError::PdfCreationError(
                "ページがありません".to_string(),
            ));
        };
        page.xobjects
            .set(name.as_bytes().to_vec(), Object::Reference(xobject));

        // PDFの原点は左下なので y を反転する
        let page_height = page.format.height_px() as f64;
        let bottom = page_height - y - height;
        page.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    real(width * PX_TO_PT),
                    0.into(),
                    0.into(),
                    real(height * PX_TO_PT),
                    real(x * PX_TO_PT),
                    real(bottom * PX_TO_PT),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.into_bytes())]),
            Operation::new("Q", vec![]),
        ]);
        Ok(())
    }

    fn pages(&self) -> Vec<PageFormat> {
        self.pages.iter().map(|p| p.format).collect()
    }

    fn output(self: Box<Self>, title: &str) -> Result<Vec<u8>, PdfValidationError> {
        let LopdfRenderer { mut doc, pages, .. } = *self;
        let pages_id = doc.new_object_id();

        let mut kids = Vec::with_capacity(pages.len());
        for page in pages {
            let content = Content {
                operations: page.operations,
            };
            let content_bytes = content
                .encode()
                .map_err(|e| PdfValidationError::PdfCreationError(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content_bytes));

            let page_id = doc.add_object(Dictionary::from_iter([
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(pages_id)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        0.into(),
                        0.into(),
                        real(page.format.width_pt()),
                        real(page.format.height_pt()),
                    ]),
                ),
                ("Contents", Object::Reference(content_id)),
                (
                    "Resources",
                    Object::Dictionary(Dictionary::from_iter([(
                        "XObject",
                        Object::Dictionary(page.xobjects),
                    )])),
                ),
            ]));
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(Dictionary::from_iter([
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Kids", Object::Array(kids)),
                ("Count", Object::Integer(count)),
            ])),
        );

        let catalog_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        let info_id = doc.add_object(Dictionary::from_iter([
            ("Title", text_string(title)),
            ("Producer", Object::string_literal("drive-blob-pdf")),
        ]));
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc.trailer.set("Info", Object::Reference(info_id));

        let mut output = Vec::new();
        doc.save_to(&mut output)
            .map_err(|e| PdfValidationError::PdfCreationError(e.to_string()))?;
        Ok(output)
    }
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

/// PDFのテキスト文字列。ASCII以外は BOM 付き UTF-16BE にする。
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        Object::string_literal(text)
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        Object::String(bytes, StringFormat::Hexadecimal)
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, PdfValidationError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    let compress_error =
        |e: std::io::Error| PdfValidationError::PdfCreationError(format!("圧縮に失敗しました: {}", e));
    encoder.write_all(data).map_err(compress_error)?;
    encoder.finish().map_err(compress_error)
}

fn flate_image_stream(
    width: u32,
    height: u32,
    color_space: &str,
    pixels: &[u8],
) -> Result<Stream, PdfValidationError> {
    let compressed = deflate(pixels)?;
    let dict = Dictionary::from_iter([
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(width as i64)),
        ("Height", Object::Integer(height as i64)),
        ("ColorSpace", Object::Name(color_space.as_bytes().to_vec())),
        ("BitsPerComponent", Object::Integer(8)),
        ("Filter", Object::Name(b"FlateDecode".to_vec())),
    ]);
    Ok(Stream::new(dict, compressed))
}

/// 画像を DeviceRGB の画像 XObject として追加する。透過がある場合は SMask を付ける。
fn image_xobject(doc: &mut Document, image: &DynamicImage) -> Result<ObjectId, PdfValidationError> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    let mut alpha = Vec::with_capacity((width * height) as usize);
    for pixel in rgba.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
    }

    let mut stream = flate_image_stream(width, height, "DeviceRGB", &rgb)?;
    if alpha.iter().any(|&a| a != u8::MAX) {
        let smask = flate_image_stream(width, height, "DeviceGray", &alpha)?;
        let smask_id = doc.add_object(smask);
        stream.dict.set("SMask", Object::Reference(smask_id));
    }
    Ok(doc.add_object(stream))
}
