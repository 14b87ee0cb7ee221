use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use report_pdf::blocks::{gallery, smart_table, table_height};
use report_pdf::compose::financial_rows;
use report_pdf::geometry::*;
use report_pdf::{
    compose_batch, compose_report, load_reports, render_batch, Amount, Document, ImageData,
    ImageKind, Letterhead, LineItem, RecordingSurface, ReportData, ReportError,
};
use std::io::Cursor;

fn png(width: u32, height: u32) -> ImageData {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([10, 120, 60])));
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png).unwrap();
    ImageData::new(ImageKind::Png, out.into_inner())
}

fn corrupt() -> ImageData {
    ImageData::new(ImageKind::Png, b"definitely not a png".to_vec())
}

fn compose(report: &ReportData) -> RecordingSurface {
    let mut doc = Document::new(RecordingSurface::new());
    compose_report(&mut doc, report, &Letterhead::default());
    doc.into_surface()
}

fn rows(n: usize) -> Vec<Vec<String>> {
    (0..n)
        .map(|i| vec![format!("Item {}", i), format!("{}", i * 10)])
        .collect()
}

#[test]
fn long_text_flows_onto_new_pages() {
    let paragraph = "Volunteers registered donors, checked vitals and served refreshments. ".repeat(12);
    let report = ReportData {
        event_name: Some("Long Report".into()),
        description: Some(vec![paragraph.as_str(); 12].join("\n")),
        ..Default::default()
    };
    let surface = compose(&report);

    assert!(surface.page_count() > 1);
    for (_, _, y) in surface.texts() {
        assert!(y >= MARGIN_MM && y <= BOTTOM_LIMIT_MM, "text at {} is off the page", y);
    }
}

#[test]
fn table_that_does_not_fit_moves_whole() {
    let mut doc = Document::new(RecordingSurface::new());
    doc.set_cursor_y(BOTTOM_LIMIT_MM - table_height(3) + 1.0);
    smart_table(&mut doc, "Income", &["SOURCE", "AMOUNT"], &rows(3), &[119.0, 51.0]);

    let surface = doc.into_surface();
    assert_eq!(surface.page_count(), 2);
    assert!(surface.ops().iter().all(|op| op.page() == 1));
    assert_eq!(surface.find_text("INCOME"), Some((1, MARGIN_MM)));
}

#[test]
fn table_that_fits_exactly_stays() {
    let mut doc = Document::new(RecordingSurface::new());
    doc.set_cursor_y(BOTTOM_LIMIT_MM - table_height(3));
    smart_table(&mut doc, "Income", &["SOURCE", "AMOUNT"], &rows(3), &[119.0, 51.0]);

    let surface = doc.into_surface();
    assert_eq!(surface.page_count(), 1);
    assert!(surface.ops().iter().all(|op| op.page() == 0));
}

#[test]
fn financial_total_skips_unreadable_amounts() {
    let report = ReportData {
        income: vec![
            LineItem::new("Sponsor", Amount::Text("5000".into())),
            LineItem::new("Pledge", Amount::Text("abc".into())),
        ],
        expense: vec![
            LineItem::new("Banner", Amount::Number(750.5)),
            LineItem::new("Tea", Amount::Text("249.5".into())),
        ],
        ..Default::default()
    };
    let surface = compose(&report);

    assert!(surface.find_text("TOTAL INCOME").is_some());
    assert!(surface.find_text("Rs. 5000").is_some());
    assert!(surface.find_text("Rs. abc").is_some());
    assert!(surface.find_text("Rs. 1000").is_some());
}

#[test]
fn gallery_images_keep_aspect_ratio() {
    let mut doc = Document::new(RecordingSurface::new());
    gallery(&mut doc, "Completion Images", &[png(1600, 1200)]);

    let (_, rect) = doc.into_surface().images().next().unwrap();
    assert!((rect.height - GALLERY_BOX_HEIGHT_MM).abs() < 1e-3);
    assert!((rect.width / rect.height - 4.0 / 3.0).abs() < 1e-3);
    let expected_x = MARGIN_MM + (CONTENT_WIDTH_MM - rect.width) / 2.0;
    assert!((rect.x - expected_x).abs() < 1e-3);
}

#[test]
fn failed_image_does_not_disturb_neighbours() {
    let mut doc = Document::new(RecordingSurface::new());
    gallery(&mut doc, "Completion Images", &[corrupt(), png(100, 100), png(100, 100)]);
    let after = doc.cursor_y();

    let surface = doc.into_surface();
    let images: Vec<_> = surface.images().collect();
    assert_eq!(images.len(), 2);

    let box_width = (CONTENT_WIDTH_MM - 2.0 * GALLERY_GAP_MM) / 3.0;
    let second_box = MARGIN_MM + box_width + GALLERY_GAP_MM;
    assert!(images[0].1.x >= second_box - 1e-3);
    assert!(images[0].1.right() <= second_box + box_width + 1e-3);
    assert!(
        (after - (MARGIN_MM + SECTION_LABEL_ADVANCE_MM + GALLERY_BOX_HEIGHT_MM + IMAGE_TRAILING_GAP_MM))
            .abs()
            < 1e-3
    );
}

#[test]
fn corrupt_poster_still_renders_rest_of_report() {
    let report = ReportData {
        event_name: Some("Poster Trouble".into()),
        poster: Some(corrupt()),
        images: vec![png(300, 200)],
        ..Default::default()
    };
    let surface = compose(&report);

    assert!(surface.find_text("PROJECT POSTER").is_some());
    assert!(surface.find_text("COMPLETION IMAGES").is_some());
    assert_eq!(surface.images().count(), 1);
}

#[test]
fn batch_puts_each_report_on_its_own_page() {
    let reports: Vec<ReportData> = ["One", "Two", "Three"]
        .iter()
        .map(|name| ReportData {
            event_name: Some(name.to_string()),
            ..Default::default()
        })
        .collect();
    let mut doc = Document::new(RecordingSurface::new());
    compose_batch(&mut doc, &reports, &Letterhead::default()).unwrap();

    let surface = doc.into_surface();
    assert_eq!(surface.page_count(), 3);
    let title_pages: Vec<usize> = ["One", "Two", "Three"]
        .iter()
        .filter_map(|name| surface.find_text(name).map(|(page, _)| page))
        .collect();
    assert_eq!(title_pages, vec![0, 1, 2]);
}

#[test]
fn empty_batch_is_an_error() {
    let err = render_batch(&[], &Default::default()).unwrap_err();
    assert!(matches!(err, ReportError::NothingToGenerate));
}

#[test]
fn loose_json_renders() {
    let reports = load_reports(
        r#"{
            "eventName": "Loose Input",
            "eventDate": "",
            "rotaractors": "4",
            "rotary": null,
            "rotaractorsDetails": [{ "name": "Asha", "club": "RAC" }],
            "income": [{ "desc": "Sponsor", "amount": "12abc" }],
            "poster": "data:image/png;base64,%%%"
        }"#,
    )
    .unwrap();
    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(report.rotaractors, 4);
    assert_eq!(report.rotary, 0);
    assert!(report.event_date.is_none());
    assert!(report.poster.as_ref().is_some_and(|p| p.decode().is_err()));

    let surface = compose(report);
    assert!(surface.find_text("Asha").is_some());
    assert!(surface.find_text("Rs. 12").is_some());
}

#[test]
fn unreadable_payloads_keep_their_slots() {
    let good = png(100, 100).to_data_uri();
    let json = serde_json::json!({
        "eventName": "Slots",
        "logos": ["data:image/png;base64,@@@", good, null],
        "images": ["data:image/png;base64,@@@", good, good]
    });
    let reports = load_reports(&json.to_string()).unwrap();
    let report = &reports[0];
    assert_eq!(report.present_logos().count(), 2);
    assert_eq!(report.images.len(), 3);

    let surface = compose(report);
    let (logo_page, logo) = surface.images().next().unwrap();
    assert_eq!(logo_page, 0);
    let strip_left = (PAGE_WIDTH_MM - (2.0 * LOGO_SIZE_MM + LOGO_GAP_MM)) / 2.0;
    assert!((logo.x - (strip_left + LOGO_SIZE_MM + LOGO_GAP_MM)).abs() < 1e-3);

    let gallery: Vec<_> = surface.images().skip(1).map(|(_, rect)| rect).collect();
    assert_eq!(gallery.len(), 2);
    let box_width = (CONTENT_WIDTH_MM - 2.0 * GALLERY_GAP_MM) / 3.0;
    for (index, rect) in gallery.iter().enumerate() {
        let box_x = MARGIN_MM + (index + 1) as f32 * (box_width + GALLERY_GAP_MM);
        assert!((rect.x - (box_x + (box_width - rect.width) / 2.0)).abs() < 1e-3);
    }
}

#[test]
fn corrupt_poster_in_batch_leaves_other_records_intact() {
    let record = |name: &str, poster: ImageData| ReportData {
        event_name: Some(name.to_string()),
        income: vec![LineItem::new(format!("{} sponsor", name), Amount::Number(100.0))],
        poster: Some(poster),
        ..Default::default()
    };
    let reports = vec![
        record("Alpha", png(100, 200)),
        record("Beta", corrupt()),
        record("Gamma", png(100, 200)),
    ];
    let mut doc = Document::new(RecordingSurface::new());
    compose_batch(&mut doc, &reports, &Letterhead::default()).unwrap();
    let surface = doc.into_surface();

    assert_eq!(surface.page_count(), 3);
    for (page, report) in reports.iter().enumerate() {
        let name = report.event_name.as_deref().unwrap();
        assert_eq!(surface.find_text(name).map(|(p, _)| p), Some(page));
        assert_eq!(surface.find_text(&format!("{} sponsor", name)).map(|(p, _)| p), Some(page));
        let total = &financial_rows(&report.income, "TOTAL INCOME")[1][1];
        assert!(surface.texts().any(|(p, text, _)| p == page && text == total));
    }

    let per_page = |page: usize| surface.images().filter(|(p, _)| *p == page).count();
    assert_eq!(per_page(0), 1);
    assert_eq!(per_page(1), 0);
    assert_eq!(per_page(2), 1);
    assert!(surface.find_text("PROJECT POSTER").is_some());
}
