use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::jpeg;
use crate::{CertificateDocument, ExportError};

/// Page is square, matching the certificate image aspect.
const PAGE_SIZE: f32 = 400.0;
/// Displayed image box.
const IMAGE_SIZE: f32 = 200.0;
const FONT_SIZE: f32 = 14.0;
const LINE_SPACING: f32 = 22.0;
/// Coarse Times-Bold advance estimate, adequate for centering short lines.
const MEAN_GLYPH_WIDTH: f32 = 0.5;

/// Render a certificate as a single fixed-size PDF page: the certificate
/// image above the student name, course title, and completion date.
///
/// Pure: the image must already be fetched. Only JPEG input is accepted —
/// it embeds without re-encoding.
pub fn render_certificate(document: &CertificateDocument) -> Result<Vec<u8>, ExportError> {
    let dims = jpeg::dimensions(&document.image)?;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Times-Bold",
    });

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(dims.width),
            "Height" => i64::from(dims.height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        document.image.clone(),
    ));

    let mut operations = Vec::new();

    // Image centered horizontally in the upper half of the page.
    let image_x = (PAGE_SIZE - IMAGE_SIZE) / 2.0;
    let image_y = PAGE_SIZE - IMAGE_SIZE - 40.0;
    operations.push(Operation::new("q", vec![]));
    operations.push(Operation::new(
        "cm",
        vec![
            IMAGE_SIZE.into(),
            0.into(),
            0.into(),
            IMAGE_SIZE.into(),
            image_x.into(),
            image_y.into(),
        ],
    ));
    operations.push(Operation::new("Do", vec!["Im0".into()]));
    operations.push(Operation::new("Q", vec![]));

    let lines = [
        document.student_name.as_str(),
        document.course_title.as_str(),
        document.completion_date.as_str(),
    ];
    let mut baseline = image_y - 36.0;
    for line in lines {
        let text_width = line.chars().count() as f32 * FONT_SIZE * MEAN_GLYPH_WIDTH;
        let x = ((PAGE_SIZE - text_width) / 2.0).max(10.0);
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]));
        operations.push(Operation::new("Td", vec![x.into(), baseline.into()]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(line)]));
        operations.push(Operation::new("ET", vec![]));
        baseline -= LINE_SPACING;
    }

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content
            .encode()
            .map_err(|err| ExportError::Render(err.to_string()))?,
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => font_id },
            "XObject" => dictionary! { "Im0" => image_id },
        },
        "MediaBox" => vec![
            0.into(),
            0.into(),
            PAGE_SIZE.into(),
            PAGE_SIZE.into(),
        ],
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|err| ExportError::Render(err.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> CertificateDocument {
        CertificateDocument {
            image: jpeg::synthetic(600, 600),
            student_name: "Ada Lovelace".into(),
            course_title: "Blockchain & Web3".into(),
            completion_date: "2024-02-01".into(),
        }
    }

    #[test]
    fn renders_a_pdf_with_the_display_strings() {
        let bytes = render_certificate(&document()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("Ada Lovelace"));
        assert!(text.contains("Blockchain & Web3"));
        assert!(text.contains("2024-02-01"));
        assert!(text.contains("Times-Bold"));
    }

    #[test]
    fn rendering_is_deterministic_for_identical_inputs() {
        assert_eq!(
            render_certificate(&document()).unwrap(),
            render_certificate(&document()).unwrap()
        );
    }

    #[test]
    fn non_jpeg_images_are_refused() {
        let mut bad = document();
        bad.image = b"\x89PNG\r\n\x1a\n rest".to_vec();
        assert!(matches!(
            render_certificate(&bad),
            Err(ExportError::UnsupportedImage)
        ));
    }
}
