//! Archivos de prueba construidos en memoria.

use exif::experimental::Writer as ExifWriter;
use exif::{Field, In, Rational, Tag, Value};
use image::codecs::gif::GifEncoder;
use image::{Frame, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
    <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
    <Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
    <Override PartName="/docProps/custom.xml" ContentType="application/vnd.openxmlformats-officedocument.custom-properties+xml"/>
</Types>
"#;

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>
"#;

pub const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
    <w:body>
        <w:p><w:r><w:t>Documento de prueba</w:t></w:r></w:p>
    </w:body>
</w:document>
"#;

pub const CORE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties"
                   xmlns:dc="http://purl.org/dc/elements/1.1/"
                   xmlns:dcterms="http://purl.org/dc/terms/"
                   xmlns:dcmitype="http://purl.org/dc/dcmitype/"
                   xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <dc:creator>Autor Prueba</dc:creator>
    <cp:lastModifiedBy>Editor Prueba</cp:lastModifiedBy>
    <dcterms:created xsi:type="dcterms:W3CDTF">2024-01-01T00:00:00Z</dcterms:created>
    <dcterms:modified xsi:type="dcterms:W3CDTF">2024-02-01T00:00:00Z</dcterms:modified>
    <dc:title>Documento Demo</dc:title>
    <dc:subject>Asunto Demo</dc:subject>
    <cp:revision>6</cp:revision>
</cp:coreProperties>
"#;

pub const APP_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"
            xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
    <Application>Microsoft Word</Application>
    <Company>Compania Demo</Company>
    <Pages>2</Pages>
    <Words>345</Words>
    <Lines>12</Lines>
    <HeadingPairs><vt:vector size="0" baseType="variant"/></HeadingPairs>
</Properties>
"#;

pub const CUSTOM_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/custom-properties"
            xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
    <property fmtid="{D5CDD505-2E9C-101B-9397-08002B2CF9AE}" pid="2" name="CustomField">
        <vt:lpwstr>Dato Confidencial</vt:lpwstr>
    </property>
    <property fmtid="{D5CDD505-2E9C-101B-9397-08002B2CF9AE}" pid="3" name="OwnerEmail">
        <vt:lpwstr>jane@example.com</vt:lpwstr>
    </property>
</Properties>
"#;

/// Documento Word con autoría, empresa y propiedades personalizadas.
pub fn sample_docx() -> TestResult<Vec<u8>> {
    docx_with_parts(&[
        ("docProps/core.xml", CORE_XML),
        ("docProps/app.xml", APP_XML),
        ("docProps/custom.xml", CUSTOM_XML),
    ])
}

pub fn docx_with_parts(doc_props: &[(&str, &str)]) -> TestResult<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::<'_, ()>::default().compression_method(CompressionMethod::Stored);

    writer.start_file("[Content_Types].xml", options)?;
    writer.write_all(CONTENT_TYPES.as_bytes())?;

    writer.start_file("_rels/.rels", options)?;
    writer.write_all(RELS_XML.as_bytes())?;

    writer.start_file("word/document.xml", options)?;
    writer.write_all(DOCUMENT_XML.as_bytes())?;

    for (name, contents) in doc_props {
        writer.start_file(*name, options)?;
        writer.write_all(contents.as_bytes())?;
    }

    Ok(writer.finish()?.into_inner())
}

/// JPEG con fabricante, modelo, artista, software y coordenadas GPS (37°46'12" N, 122°25'12" W).
pub fn jpeg_with_exif() -> TestResult<Vec<u8>> {
    let image = RgbImage::from_pixel(16, 16, Rgb([200, 40, 40]));
    let mut jpeg = Vec::new();
    image.write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)?;

    let ascii = |text: &str| Value::Ascii(vec![text.as_bytes().to_vec()]);
    let rationals = |parts: [(u32, u32); 3]| {
        Value::Rational(parts.into_iter().map(Rational::from).collect())
    };
    let field = |tag: Tag, value: Value| Field {
        tag,
        ifd_num: In::PRIMARY,
        value,
    };

    let fields = [
        field(Tag::Make, ascii("Canon")),
        field(Tag::Model, ascii("EOS 5D")),
        field(Tag::Artist, ascii("Jane Doe")),
        field(Tag::Software, ascii("GIMP 2.10")),
        field(Tag::DateTime, ascii("2024:05:01 10:30:00")),
        field(Tag::GPSLatitudeRef, ascii("N")),
        field(Tag::GPSLatitude, rationals([(37, 1), (46, 1), (12, 1)])),
        field(Tag::GPSLongitudeRef, ascii("W")),
        field(Tag::GPSLongitude, rationals([(122, 1), (25, 1), (12, 1)])),
    ];

    let mut writer = ExifWriter::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, false)?;

    Ok(insert_app1_exif(&jpeg, &tiff.into_inner()))
}

/// Inserta un segmento APP1 `Exif` justo después del marcador SOI.
fn insert_app1_exif(jpeg: &[u8], tiff: &[u8]) -> Vec<u8> {
    let payload_len = (2 + 6 + tiff.len()) as u16;
    let mut output = Vec::with_capacity(jpeg.len() + payload_len as usize + 2);
    output.extend_from_slice(&jpeg[..2]);
    output.extend_from_slice(&[0xFF, 0xE1]);
    output.extend_from_slice(&payload_len.to_be_bytes());
    output.extend_from_slice(b"Exif\0\0");
    output.extend_from_slice(tiff);
    output.extend_from_slice(&jpeg[2..]);
    output
}

/// PNG semitransparente sin metadata.
pub fn transparent_png() -> TestResult<Vec<u8>> {
    let image = RgbaImage::from_pixel(8, 8, Rgba([10, 120, 200, 0]));
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

/// GIF con `frames` fotogramas de colores distintos.
pub fn gif_with_frames(frames: u8) -> TestResult<Vec<u8>> {
    let mut gif = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut gif);
        encoder.encode_frames((0..frames).map(|index| {
            Frame::new(RgbaImage::from_pixel(8, 8, Rgba([index.wrapping_mul(80), 40, 200, 255])))
        }))?;
    }
    Ok(gif)
}

/// PDF de una página con diccionario Info completo y flujo XMP en el catálogo.
pub fn pdf_with_info() -> TestResult<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![50.into(), 750.into()]),
            Operation::new("Tj", vec![Object::string_literal("Informe")]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let xmp_id = doc.add_object(Stream::new(
        dictionary! { "Type" => "Metadata", "Subtype" => "XML" },
        b"<x:xmpmeta xmlns:x=\"adobe:ns:meta/\"><dc:creator>Jane Doe</dc:creator></x:xmpmeta>"
            .to_vec(),
    ));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
        "Metadata" => xmp_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut subject = vec![0xFE, 0xFF];
    for unit in "Ubicación privada".encode_utf16() {
        subject.extend_from_slice(&unit.to_be_bytes());
    }
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal("Informe trimestral"),
        "Author" => Object::string_literal("Jane Doe"),
        "Producer" => Object::string_literal("LibreOffice 7.6"),
        "CreationDate" => Object::string_literal("D:20240501103000Z"),
        "Subject" => Object::String(subject, StringFormat::Hexadecimal),
    });
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}
