//! File content for the viewer and the content export.
//!
//! Binary files are recognised by a magic-byte prefix or by a high share of
//! control bytes. Text is split into pages lazily: a page is recomputed from
//! the content each time it is asked for, so the only cursor is the page
//! index held by the caller.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Number of leading bytes inspected by [`is_binary`].
pub const SNIFF_BYTES: usize = 4096;

/// Prefixes of common binary formats.
const MAGIC_SIGNATURES: &[&[u8]] = &[
    &[0xFF, 0xD8, 0xFF],       // JPEG
    &[0x89, 0x50, 0x4E, 0x47], // PNG
    &[0x50, 0x4B, 0x03, 0x04], // ZIP
    &[0x50, 0x4B, 0x05, 0x06], // ZIP (empty archive)
    &[0x50, 0x4B, 0x07, 0x08], // ZIP (spanned)
    b"%PDF",
    b"GIF8",
    b"RIFF",
    &[0x1F, 0x8B], // GZIP
    b"BM",
];

/// Classify a byte prefix.
///
/// Binary when it starts with a known signature, or when null bytes or
/// bytes below 9 make up more than a tenth of it.
pub fn looks_binary(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return false;
    }
    if MAGIC_SIGNATURES.iter().any(|sig| bytes.starts_with(sig)) {
        return true;
    }
    let nulls = bytes.iter().filter(|&&b| b == 0).count();
    let controls = bytes.iter().filter(|&&b| b < 9).count();
    let limit = bytes.len() / 10;
    nulls > limit || controls > limit
}

/// Check whether the file at `path` is binary.
///
/// Files that cannot be opened or read count as text, so the viewer tries
/// to show them and reports the real read error.
pub fn is_binary(path: &Path) -> bool {
    let file = match fs::File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };
    let mut buf = Vec::with_capacity(SNIFF_BYTES);
    match file.take(SNIFF_BYTES as u64).read_to_end(&mut buf) {
        Ok(_) => looks_binary(&buf),
        Err(_) => false,
    }
}

/// Read a file as text, replacing invalid UTF-8.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

/// Text split into pages of a fixed number of lines.
#[derive(Debug, Clone)]
pub struct Pages {
    content: String,
    page_height: usize,
    line_count: usize,
}

/// Split `content` into pages of `page_height` lines. A height of zero is
/// treated as one.
pub fn paginate(content: impl Into<String>, page_height: usize) -> Pages {
    let content = content.into();
    let line_count = content.lines().count();
    Pages {
        content,
        page_height: page_height.max(1),
        line_count,
    }
}

impl Pages {
    pub fn page_height(&self) -> usize {
        self.page_height
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Always at least one; empty content has a single empty page.
    pub fn page_count(&self) -> usize {
        self.line_count.div_ceil(self.page_height).max(1)
    }

    /// Lines of page `n`, or `None` past the last page.
    pub fn page(&self, n: usize) -> Option<Vec<&str>> {
        if n >= self.page_count() {
            return None;
        }
        Some(
            self.content
                .lines()
                .skip(n * self.page_height)
                .take(self.page_height)
                .collect(),
        )
    }

    /// Zero-based index of the first line on page `n`.
    pub fn first_line(&self, n: usize) -> usize {
        n * self.page_height
    }

    /// Page that shows line `line`, clamped to the last page.
    pub fn page_of_line(&self, line: usize) -> usize {
        (line / self.page_height).min(self.page_count() - 1)
    }

    /// A fresh iterator over every page.
    pub fn iter(&self) -> PageIter<'_> {
        PageIter {
            pages: self,
            next: 0,
        }
    }

    pub fn set_page_height(&mut self, page_height: usize) {
        self.page_height = page_height.max(1);
    }
}

pub struct PageIter<'a> {
    pages: &'a Pages,
    next: usize,
}

impl<'a> Iterator for PageIter<'a> {
    type Item = Vec<&'a str>;

    fn next(&mut self) -> Option<Self::Item> {
        let page = self.pages.page(self.next)?;
        self.next += 1;
        Some(page)
    }
}

impl<'a> IntoIterator for &'a Pages {
    type Item = Vec<&'a str>;
    type IntoIter = PageIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Split `files` into (viewable, binary), keeping their order.
pub fn partition_binary(files: &[PathBuf]) -> (Vec<PathBuf>, Vec<PathBuf>) {
    files.iter().cloned().partition(|path| !is_binary(path))
}

/// Warning naming how many binary files were skipped and which ones.
/// `None` when nothing was skipped.
pub fn skipped_warning(skipped: &[PathBuf]) -> Option<String> {
    if skipped.is_empty() {
        return None;
    }
    let names: Vec<String> = skipped.iter().map(|p| p.display().to_string()).collect();
    let noun = if skipped.len() == 1 { "file" } else { "files" };
    Some(format!(
        "Skipped {} binary {}: {}",
        skipped.len(),
        noun,
        names.join(", ")
    ))
}

/// One file's text for the content export.
#[derive(Debug)]
pub struct ContentEntry {
    pub path: PathBuf,
    pub content: Result<String>,
}

/// Read every non-binary file in `files`.
///
/// Returns the entries in input order plus the binary files that were
/// skipped. A read failure is kept in its entry and does not stop the rest.
pub fn collect_entries(files: &[PathBuf]) -> (Vec<ContentEntry>, Vec<PathBuf>) {
    let (viewable, skipped) = partition_binary(files);
    let entries = viewable
        .into_iter()
        .map(|path| {
            let content = read_text(&path);
            if let Err(e) = &content {
                tracing::warn!(error = %e, "export read failed");
            }
            ContentEntry { path, content }
        })
        .collect();
    (entries, skipped)
}

/// What the viewer shows for the current file.
pub enum PageView<'a> {
    Lines {
        lines: Vec<&'a str>,
        /// One-based number of the first line, for the gutter.
        first_line_number: usize,
    },
    Error(&'a AppError),
}

/// Paging state of the interactive viewer.
///
/// Holds the viewable files, the current file's pages and the page index.
/// Switching file reads the new file; switching page only slices.
#[derive(Debug)]
pub struct ViewerState {
    files: Vec<PathBuf>,
    file_index: usize,
    page_index: usize,
    page_height: usize,
    document: Result<Pages>,
}

impl ViewerState {
    /// Open the first of `files`. `None` when there is nothing to show.
    pub fn open(files: Vec<PathBuf>, page_height: usize) -> Option<Self> {
        let first = files.first()?;
        let page_height = page_height.max(1);
        let document = load(first, page_height);
        Some(Self {
            files,
            file_index: 0,
            page_index: 0,
            page_height,
            document,
        })
    }

    pub fn current_path(&self) -> &Path {
        &self.files[self.file_index]
    }

    pub fn file_index(&self) -> usize {
        self.file_index
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_count(&self) -> usize {
        match &self.document {
            Ok(pages) => pages.page_count(),
            Err(_) => 1,
        }
    }

    pub fn page_height(&self) -> usize {
        match &self.document {
            Ok(pages) => pages.page_height(),
            Err(_) => self.page_height,
        }
    }

    pub fn current_page(&self) -> PageView<'_> {
        match &self.document {
            Ok(pages) => PageView::Lines {
                lines: pages.page(self.page_index).unwrap_or_default(),
                first_line_number: pages.first_line(self.page_index) + 1,
            },
            Err(e) => PageView::Error(e),
        }
    }

    /// Returns `false` when already on the last page.
    pub fn next_page(&mut self) -> bool {
        if self.page_index + 1 < self.page_count() {
            self.page_index += 1;
            true
        } else {
            false
        }
    }

    /// Returns `false` when already on the first page.
    pub fn previous_page(&mut self) -> bool {
        if self.page_index > 0 {
            self.page_index -= 1;
            true
        } else {
            false
        }
    }

    /// Returns `false` when already on the last file.
    pub fn next_file(&mut self) -> bool {
        if self.file_index + 1 < self.files.len() {
            self.switch_to(self.file_index + 1);
            true
        } else {
            false
        }
    }

    /// Returns `false` when already on the first file.
    pub fn previous_file(&mut self) -> bool {
        if self.file_index > 0 {
            self.switch_to(self.file_index - 1);
            true
        } else {
            false
        }
    }

    /// Change the page height, keeping the first visible line on screen.
    pub fn resize(&mut self, page_height: usize) {
        let page_height = page_height.max(1);
        if page_height == self.page_height {
            return;
        }
        self.page_height = page_height;
        if let Ok(pages) = &mut self.document {
            let first = pages.first_line(self.page_index);
            pages.set_page_height(page_height);
            self.page_index = pages.page_of_line(first);
        }
    }

    fn switch_to(&mut self, index: usize) {
        self.file_index = index;
        self.page_index = 0;
        self.document = load(&self.files[index], self.page_height);
        tracing::debug!(path = %self.files[index].display(), "viewer switched file");
    }
}

fn load(path: &Path, page_height: usize) -> Result<Pages> {
    read_text(path).map(|text| paginate(text, page_height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(bytes).unwrap();
        path
    }

    fn numbered(n: usize) -> String {
        (1..=n).map(|i| format!("line {i}\n")).collect()
    }

    // === Binary detection ===

    #[test]
    fn png_signature_on_ten_byte_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "image.dat",
            &[0x89, 0x50, 0x4E, 0x47, b'a', b'b', b'c', b'd', b'e', b'f'],
        );
        assert!(is_binary(&path));
    }

    #[test]
    fn every_signature_is_binary() {
        for sig in MAGIC_SIGNATURES {
            let mut bytes = sig.to_vec();
            bytes.extend_from_slice(b" followed by plain text");
            assert!(looks_binary(&bytes), "signature {sig:?} not detected");
        }
    }

    #[test]
    fn text_file_not_binary() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "hello.txt", b"This is plain text\n\twith a tab\r\n");
        assert!(!is_binary(&path));
    }

    #[test]
    fn null_heavy_file_is_binary() {
        let dir = TempDir::new().unwrap();
        let mut bytes = vec![b'x'; 80];
        bytes.extend(std::iter::repeat(0u8).take(20));
        let path = write_file(dir.path(), "blob", &bytes);
        assert!(is_binary(&path));
    }

    #[test]
    fn control_byte_threshold() {
        // 10 of 100 is not more than a tenth.
        let mut at_limit = vec![b'x'; 90];
        at_limit.extend(std::iter::repeat(0x01u8).take(10));
        assert!(!looks_binary(&at_limit));

        let mut over = vec![b'x'; 89];
        over.extend(std::iter::repeat(0x01u8).take(11));
        assert!(looks_binary(&over));
    }

    #[test]
    fn only_first_block_is_inspected() {
        let dir = TempDir::new().unwrap();
        let mut bytes = vec![b'a'; SNIFF_BYTES];
        bytes.extend(std::iter::repeat(0u8).take(SNIFF_BYTES));
        let path = write_file(dir.path(), "late_nulls.log", &bytes);
        assert!(!is_binary(&path));
    }

    #[test]
    fn empty_and_missing_files_are_not_binary() {
        let dir = TempDir::new().unwrap();
        let empty = write_file(dir.path(), "empty", b"");
        assert!(!is_binary(&empty));
        assert!(!is_binary(Path::new("/nonexistent/file.dat")));
    }

    // === Reading ===

    #[test]
    fn read_text_replaces_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "latin1.txt", b"caf\xe9\n");
        assert_eq!(read_text(&path).unwrap(), "caf\u{FFFD}\n");
    }

    #[test]
    fn read_text_missing_file_is_read_error() {
        let err = read_text(Path::new("/nonexistent/notes.md")).unwrap_err();
        assert!(matches!(err, AppError::Read { .. }));
    }

    // === Pagination ===

    #[test]
    fn paginate_splits_by_line() {
        let pages = paginate(numbered(25), 10);
        assert_eq!(pages.page_count(), 3);
        assert_eq!(pages.page(0).unwrap().len(), 10);
        assert_eq!(pages.page(2).unwrap(), vec!["line 21", "line 22", "line 23", "line 24", "line 25"]);
        assert!(pages.page(3).is_none());
    }

    #[test]
    fn pages_are_independent_and_restartable() {
        let pages = paginate(numbered(7), 3);
        let page_one = pages.page(1).unwrap();
        assert_eq!(pages.page(1).unwrap(), page_one);

        let first_pass: Vec<Vec<&str>> = pages.iter().collect();
        let second_pass: Vec<Vec<&str>> = (&pages).into_iter().collect();
        assert_eq!(first_pass.len(), 3);
        assert_eq!(first_pass, second_pass);
        assert_eq!(first_pass[1], page_one);
    }

    #[test]
    fn empty_content_has_one_empty_page() {
        let pages = paginate("", 10);
        assert_eq!(pages.page_count(), 1);
        assert_eq!(pages.page(0).unwrap(), Vec::<&str>::new());
    }

    #[test]
    fn zero_page_height_treated_as_one() {
        let pages = paginate("a\nb\n", 0);
        assert_eq!(pages.page_height(), 1);
        assert_eq!(pages.page_count(), 2);
    }

    // === Partition / warning ===

    #[test]
    fn partition_keeps_order() {
        let dir = TempDir::new().unwrap();
        let a = write_file(dir.path(), "a.txt", b"alpha\n");
        let img = write_file(dir.path(), "b.gif", b"GIF89a....");
        let c = write_file(dir.path(), "c.txt", b"gamma\n");
        let (viewable, skipped) = partition_binary(&[a.clone(), img.clone(), c.clone()]);
        assert_eq!(viewable, vec![a, c]);
        assert_eq!(skipped, vec![img]);
    }

    #[test]
    fn skipped_warning_names_files() {
        assert_eq!(skipped_warning(&[]), None);
        let one = skipped_warning(&[PathBuf::from("/p/logo.png")]).unwrap();
        assert_eq!(one, "Skipped 1 binary file: /p/logo.png");
        let two = skipped_warning(&[PathBuf::from("/p/a.zip"), PathBuf::from("/p/b.pdf")]).unwrap();
        assert_eq!(two, "Skipped 2 binary files: /p/a.zip, /p/b.pdf");
    }

    #[test]
    fn collect_entries_inlines_failures() {
        let dir = TempDir::new().unwrap();
        let good = write_file(dir.path(), "good.txt", b"hello\n");
        let gone = dir.path().join("gone.txt");
        let zip = write_file(dir.path(), "pack.zip", &[0x50, 0x4B, 0x03, 0x04, 0, 0]);

        let (entries, skipped) = collect_entries(&[good.clone(), gone.clone(), zip.clone()]);
        assert_eq!(skipped, vec![zip]);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, good);
        assert_eq!(entries[0].content.as_deref().unwrap(), "hello\n");
        assert_eq!(entries[1].path, gone);
        assert!(entries[1].content.is_err());
    }

    // === Viewer state ===

    #[test]
    fn viewer_opens_nothing_for_empty_list() {
        assert!(ViewerState::open(Vec::new(), 10).is_none());
    }

    #[test]
    fn viewer_pages_and_files() {
        let dir = TempDir::new().unwrap();
        let first = write_file(dir.path(), "first.txt", numbered(12).as_bytes());
        let second = write_file(dir.path(), "second.txt", b"only line\n");
        let mut viewer = ViewerState::open(vec![first.clone(), second.clone()], 5).unwrap();

        assert_eq!(viewer.current_path(), first);
        assert_eq!(viewer.page_count(), 3);
        assert!(!viewer.previous_page());
        assert!(viewer.next_page());
        assert!(viewer.next_page());
        assert!(!viewer.next_page());
        match viewer.current_page() {
            PageView::Lines { lines, first_line_number } => {
                assert_eq!(lines, vec!["line 11", "line 12"]);
                assert_eq!(first_line_number, 11);
            }
            PageView::Error(_) => panic!("expected lines"),
        }

        assert!(viewer.next_file());
        assert_eq!(viewer.current_path(), second);
        assert_eq!(viewer.page_index(), 0);
        assert!(!viewer.next_file());
        assert!(viewer.previous_file());
        assert_eq!(viewer.file_index(), 0);
        assert!(!viewer.previous_file());
    }

    #[test]
    fn viewer_shows_read_error_inline() {
        let dir = TempDir::new().unwrap();
        let good = write_file(dir.path(), "good.txt", b"ok\n");
        let missing = dir.path().join("missing.txt");
        let mut viewer = ViewerState::open(vec![missing, good], 5).unwrap();

        assert!(matches!(viewer.current_page(), PageView::Error(AppError::Read { .. })));
        assert_eq!(viewer.page_count(), 1);
        assert!(viewer.next_file());
        assert!(matches!(viewer.current_page(), PageView::Lines { .. }));
    }

    #[test]
    fn resize_keeps_first_visible_line() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "long.txt", numbered(100).as_bytes());
        let mut viewer = ViewerState::open(vec![path], 10).unwrap();
        for _ in 0..3 {
            viewer.next_page();
        }
        // First visible line is line 31 (index 30).
        viewer.resize(7);
        assert_eq!(viewer.page_height(), 7);
        assert_eq!(viewer.page_index(), 4);
        match viewer.current_page() {
            PageView::Lines { lines, first_line_number } => {
                assert_eq!(first_line_number, 29);
                assert!(lines.contains(&"line 31"));
            }
            PageView::Error(_) => panic!("expected lines"),
        }
    }
}
