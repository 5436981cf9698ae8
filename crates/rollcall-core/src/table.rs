//! Registered-user table, rebuilt from on-disk state on every refresh.

use crate::age::AgeStore;
use crate::attendance::AttendanceLedger;
use crate::gender::{predict_gender, GenderClassifier};
use crate::registry::Registry;
use crate::render::{self, RenderStyle};
use crate::types::{AgeEstimate, AttendanceStatus, Gender};
use chrono::NaiveDate;
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// Bounding box applied to thumbnails, aspect ratio preserved.
pub const THUMBNAIL_SIZE: u32 = 60;

const IMAGE_EXTENSION: &str = "jpg";

/// Where the table reads its inputs from.
#[derive(Debug, Clone)]
pub struct TableSources {
    pub images_dir: PathBuf,
    pub attendance: AttendanceLedger,
    pub ages: AgeStore,
}

/// Image cell contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Thumbnail {
    Loaded { width: u32, height: u32 },
    /// The image could not be decoded.
    NotFound,
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub name: String,
    pub image: PathBuf,
    pub thumbnail: Thumbnail,
    pub roll_no: String,
    pub gender: Gender,
    pub attendance: AttendanceStatus,
    pub age: AgeEstimate,
}

pub struct UserTable<C> {
    sources: TableSources,
    registry: Registry,
    classifier: C,
    rows: Vec<UserRow>,
}

impl<C: GenderClassifier> UserTable<C> {
    /// Build the table and populate it once.
    pub fn new(sources: TableSources, registry: Registry, classifier: C) -> Self {
        let mut table = Self {
            sources,
            registry,
            classifier,
            rows: Vec::new(),
        };
        table.refresh();
        table
    }

    pub fn rows(&self) -> &[UserRow] {
        &self.rows
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Drop all rows and rebuild them against today's attendance.
    pub fn refresh(&mut self) -> &[UserRow] {
        self.refresh_on(chrono::Local::now().date_naive())
    }

    /// Drop all rows and rebuild them, checking attendance for `date`.
    pub fn refresh_on(&mut self, date: NaiveDate) -> &[UserRow] {
        self.rows.clear();

        for path in list_images(&self.sources.images_dir) {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_owned) else {
                continue;
            };
            let roll_no = self.registry.roll_no_or_unknown(&name).to_string();

            let (thumbnail, gender) = match image::open(&path) {
                Ok(decoded) => (
                    thumbnail_of(&decoded),
                    predict_gender(&mut self.classifier, &path, &decoded),
                ),
                Err(e) => {
                    tracing::warn!(image = %path.display(), error = %e, "error loading image");
                    (Thumbnail::NotFound, Gender::Unknown)
                }
            };

            let attendance = self.sources.attendance.status_on(&name, &roll_no, date);
            let age = self.sources.ages.lookup(&name);

            self.rows.push(UserRow {
                name,
                image: path,
                thumbnail,
                roll_no,
                gender,
                attendance,
                age,
            });
        }

        tracing::debug!(rows = self.rows.len(), "user table refreshed");
        &self.rows
    }

    pub fn render(&self, style: RenderStyle) -> String {
        render::render_table(&self.rows, style)
    }
}

/// `*.jpg` entries of `dir`, sorted by file name. Missing or unreadable
/// directories yield nothing.
fn list_images(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "cannot list image directory");
            return Vec::new();
        }
    };

    let mut images: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == IMAGE_EXTENSION))
        .collect();
    images.sort();
    images
}

/// Shrink `img` into the thumbnail box. Never enlarges.
fn thumbnail_of(img: &DynamicImage) -> Thumbnail {
    if img.width() <= THUMBNAIL_SIZE && img.height() <= THUMBNAIL_SIZE {
        return Thumbnail::Loaded {
            width: img.width(),
            height: img.height(),
        };
    }
    let thumb = img.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE);
    Thumbnail::Loaded {
        width: thumb.width(),
        height: thumb.height(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gender::{GenderError, NoClassifier};
    use crate::types::GenderScores;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;

    /// Classifier that answers `Man` and records the size of each image it sees.
    #[derive(Clone, Default)]
    struct Counting(Rc<RefCell<Vec<(u32, u32)>>>);

    impl Counting {
        fn calls(&self) -> usize {
            self.0.borrow().len()
        }
    }

    impl GenderClassifier for Counting {
        fn classify_image(&mut self, image: &DynamicImage) -> Result<GenderScores, GenderError> {
            self.0.borrow_mut().push((image.width(), image.height()));
            Ok(GenderScores { woman: 0.25, man: 0.75 })
        }

        fn classify(&mut self, _path: &Path) -> Result<GenderScores, GenderError> {
            panic!("table must reuse the decoded image");
        }
    }

    struct Fixture {
        dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            fs::create_dir(dir.path().join("faces")).unwrap();
            fs::create_dir(dir.path().join("ages")).unwrap();
            Self { dir }
        }

        fn sources(&self) -> TableSources {
            TableSources {
                images_dir: self.dir.path().join("faces"),
                attendance: AttendanceLedger::new(self.dir.path().join("attendance.csv")),
                ages: AgeStore::new(self.dir.path().join("ages")),
            }
        }

        fn add_image(&self, file: &str, width: u32, height: u32) {
            image::RgbImage::from_pixel(width, height, image::Rgb([120, 90, 60]))
                .save(self.dir.path().join("faces").join(file))
                .unwrap();
        }

        fn write(&self, rel: &str, contents: &str) {
            fs::write(self.dir.path().join(rel), contents).unwrap();
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn registry() -> Registry {
        let mut r = Registry::new();
        r.register("alice", "CS-1").unwrap();
        r.register("bob", "CS-2").unwrap();
        r
    }

    #[test]
    fn test_missing_image_dir_gives_empty_table() {
        let fixture = Fixture::new();
        let mut sources = fixture.sources();
        sources.images_dir = fixture.dir.path().join("missing");
        let mut table = UserTable::new(sources, registry(), NoClassifier);
        assert!(table.refresh_on(day()).is_empty());
    }

    #[test]
    fn test_rows_combine_all_lookups() {
        let fixture = Fixture::new();
        fixture.add_image("alice.jpg", 120, 90);
        fixture.add_image("carol.jpg", 30, 30);
        fixture.write("attendance.csv", "Name,Roll No,Date\nalice,CS-1,2024-03-01\n");
        fixture.write("ages/alice.json", r#"{"median_age": 24}"#);

        let mut table = UserTable::new(fixture.sources(), registry(), Counting::default());
        let rows = table.refresh_on(day()).to_vec();
        assert_eq!(rows.len(), 2);

        let alice = &rows[0];
        assert_eq!(alice.name, "alice");
        assert_eq!(alice.roll_no, "CS-1");
        assert_eq!(alice.thumbnail, Thumbnail::Loaded { width: 60, height: 45 });
        assert_eq!(alice.gender, Gender::Man);
        assert_eq!(alice.attendance, AttendanceStatus::Present);
        assert_eq!(alice.age.to_string(), "24 years");

        let carol = &rows[1];
        assert_eq!(carol.roll_no, "N/A");
        assert_eq!(carol.thumbnail, Thumbnail::Loaded { width: 30, height: 30 });
        assert_eq!(carol.attendance, AttendanceStatus::Absent);
        assert_eq!(carol.age, AgeEstimate::NotYetPredicted);
    }

    #[test]
    fn test_only_jpg_files_are_listed() {
        let fixture = Fixture::new();
        fixture.add_image("alice.jpg", 10, 10);
        fixture.add_image("bob.png", 10, 10);
        fixture.write("faces/notes.txt", "hello");

        let table = UserTable::new(fixture.sources(), registry(), NoClassifier);
        let names: Vec<_> = table.rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["alice"]);
    }

    #[test]
    fn test_undecodable_image_uses_placeholder() {
        let fixture = Fixture::new();
        fixture.write("faces/bob.jpg", "not a jpeg");

        let calls = Counting::default();
        let table = UserTable::new(fixture.sources(), registry(), calls.clone());
        let bob = &table.rows()[0];
        assert_eq!(bob.thumbnail, Thumbnail::NotFound);
        assert_eq!(bob.gender, Gender::Unknown);
        assert_eq!(bob.roll_no, "CS-2");
        assert_eq!(calls.calls(), 0, "classifier must not run on an unreadable image");
    }

    #[test]
    fn test_classifier_failure_is_unknown() {
        let fixture = Fixture::new();
        fixture.add_image("alice.jpg", 10, 10);
        let table = UserTable::new(fixture.sources(), registry(), NoClassifier);
        assert_eq!(table.rows()[0].gender, Gender::Unknown);
        assert!(matches!(table.rows()[0].thumbnail, Thumbnail::Loaded { .. }));
    }

    #[test]
    fn test_classifier_gets_full_size_decoded_image() {
        let fixture = Fixture::new();
        fixture.add_image("alice.jpg", 120, 90);

        let calls = Counting::default();
        let mut table = UserTable::new(fixture.sources(), registry(), calls.clone());
        assert_eq!(*calls.0.borrow(), vec![(120, 90)]);

        table.refresh_on(day());
        assert_eq!(calls.calls(), 2);
        assert_eq!(table.rows()[0].thumbnail, Thumbnail::Loaded { width: 60, height: 45 });
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let fixture = Fixture::new();
        fixture.add_image("alice.jpg", 64, 64);
        fixture.add_image("bob.jpg", 80, 40);
        fixture.write("attendance.csv", "Name,Roll No,Date\nbob,CS-2,2024-03-01\n");

        let mut table = UserTable::new(fixture.sources(), registry(), Counting::default());
        let first = table.refresh_on(day()).to_vec();
        let second = table.refresh_on(day()).to_vec();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(
            table.render(RenderStyle::plain()),
            table.render(RenderStyle::plain())
        );
    }

    #[test]
    fn test_refresh_picks_up_new_state() {
        let fixture = Fixture::new();
        fixture.add_image("alice.jpg", 10, 10);
        let mut table = UserTable::new(fixture.sources(), registry(), NoClassifier);
        assert_eq!(table.refresh_on(day())[0].attendance, AttendanceStatus::Absent);

        fixture.write("attendance.csv", "Name,Roll No,Date\nalice,CS-1,2024-03-01\n");
        fixture.add_image("bob.jpg", 10, 10);
        let rows = table.refresh_on(day());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].attendance, AttendanceStatus::Present);
    }
}
