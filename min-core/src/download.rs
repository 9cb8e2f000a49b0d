use min_content::protocol::OpenPdf;

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Fragment the PDF viewer appends when the user asks to save the document,
/// so the download is not bounced back into the viewer.
pub const VIEWER_DOWNLOAD_MARKER: &str = "#pdfjs.action=download";

/// A download reported by the webview session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadInfo {
    pub url: String,
    pub mime_type: String,
    /// Identifier of the web content that started the download.
    pub content_process_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadDecision {
    /// Cancel the native download and show the document in the viewer.
    OpenInViewer(OpenPdf),
    /// Let the download continue natively.
    Proceed,
}

impl DownloadDecision {
    pub fn prevents_default(&self) -> bool {
        matches!(self, DownloadDecision::OpenInViewer(_))
    }
}

/// Decide whether a download is handed to the in-app PDF viewer.
///
/// Blob URLs are produced by the viewer's own download button and must
/// stay downloads, as must anything carrying the viewer's download marker.
pub fn classify(download: &DownloadInfo) -> DownloadDecision {
    let is_pdf = download.mime_type == PDF_MIME_TYPE;
    let from_viewer =
        download.url.starts_with("blob:") || download.url.contains(VIEWER_DOWNLOAD_MARKER);
    if is_pdf && !from_viewer {
        DownloadDecision::OpenInViewer(OpenPdf {
            url: download.url.clone(),
            content_process_id: download.content_process_id,
        })
    } else {
        DownloadDecision::Proceed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn download(url: &str, mime_type: &str) -> DownloadInfo {
        DownloadInfo {
            url: url.to_string(),
            mime_type: mime_type.to_string(),
            content_process_id: 3,
        }
    }

    #[test]
    fn pdf_is_opened_in_viewer() {
        let decision = classify(&download("https://example.com/doc.pdf", PDF_MIME_TYPE));
        assert!(decision.prevents_default());
        assert_eq!(
            decision,
            DownloadDecision::OpenInViewer(OpenPdf {
                url: "https://example.com/doc.pdf".to_string(),
                content_process_id: 3,
            })
        );
    }

    #[test]
    fn blob_pdf_proceeds() {
        let decision = classify(&download("blob:abc123", PDF_MIME_TYPE));
        assert_eq!(decision, DownloadDecision::Proceed);
        assert!(!decision.prevents_default());
    }

    #[test]
    fn viewer_download_marker_proceeds() {
        let decision = classify(&download(
            "https://example.com/doc.pdf#pdfjs.action=download",
            PDF_MIME_TYPE,
        ));
        assert_eq!(decision, DownloadDecision::Proceed);
    }

    #[test]
    fn non_pdf_proceeds() {
        assert_eq!(
            classify(&download("https://example.com/a.zip", "application/zip")),
            DownloadDecision::Proceed
        );
        // The MIME type must match exactly.
        assert_eq!(
            classify(&download("https://example.com/doc.pdf", "application/pdf; charset=binary")),
            DownloadDecision::Proceed
        );
    }

    #[test]
    fn blob_marker_only_counts_as_prefix() {
        let decision = classify(&download("https://example.com/blob:doc.pdf", PDF_MIME_TYPE));
        assert!(decision.prevents_default());
    }
}
