use lopdf::Document as LopdfDocument;

/// The decoded content stream of a 1-based page, as lossy text.
pub fn page_content(doc: &LopdfDocument, page_number: u32) -> String {
    doc.get_pages()
        .get(&page_number)
        .and_then(|id| doc.get_page_content(*id).ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

/// Names of the XObjects a page references.
pub fn page_xobjects(doc: &LopdfDocument, page_number: u32) -> Vec<String> {
    let Some(page_id) = doc.get_pages().get(&page_number).copied() else {
        return Vec::new();
    };
    doc.get_dictionary(page_id)
        .and_then(|page| page.get(b"Resources"))
        .and_then(|r| r.as_dict())
        .and_then(|r| r.get(b"XObject"))
        .and_then(|x| x.as_dict())
        .map(|x| x.iter().map(|(k, _)| String::from_utf8_lossy(k).into_owned()).collect())
        .unwrap_or_default()
}

/// Assert that a page's content stream contains a text-show of `$text`
#[macro_export]
macro_rules! assert_page_shows {
    ($pdf:expr, $page:expr, $text:expr) => {
        let content = $crate::common::pdf_assertions::page_content(&$pdf.doc, $page);
        let needle = format!("({})", $text);
        assert!(
            content.contains(&needle),
            "page {} should show '{}', but its content was:\n{}",
            $page,
            $text,
            content
        );
    };
}

/// Assert that a page's content stream does NOT show `$text`
#[macro_export]
macro_rules! assert_page_not_shows {
    ($pdf:expr, $page:expr, $text:expr) => {
        let content = $crate::common::pdf_assertions::page_content(&$pdf.doc, $page);
        let needle = format!("({})", $text);
        assert!(
            !content.contains(&needle),
            "page {} should not show '{}', but it does",
            $page,
            $text
        );
    };
}

/// Assert the number of pages in a PDF
#[macro_export]
macro_rules! assert_pdf_page_count {
    ($pdf:expr, $count:expr) => {
        assert_eq!(
            $pdf.page_count(),
            $count,
            "Expected {} pages, got {}",
            $count,
            $pdf.page_count()
        );
    };
}
