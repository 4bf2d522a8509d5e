//! Course builder session: the user's selection set, its description text and
//! the browse preferences that go with it.
//!
//! A session is plain owned state. The WebSocket handler keeps one per
//! connection and passes it explicitly to every operation.

use tracing::debug;

use crate::config::CourseCfg;
use crate::describe::describe;
use crate::domain::{Catalog, Lesson};
use crate::filter::LessonFilter;

/// Lessons chosen for a course, keyed by lesson id, in the order they were added.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    lessons: Vec<Lesson>,
}

impl Selection {
    pub fn contains(&self, id: &str) -> bool {
        self.lessons.iter().any(|l| l.id == id)
    }

    /// Add the lesson if absent, remove it if present. Returns true when it is now selected.
    pub fn toggle(&mut self, lesson: &Lesson) -> bool {
        if self.remove(&lesson.id) {
            false
        } else {
            self.lessons.push(lesson.clone());
            true
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.lessons.len();
        self.lessons.retain(|l| l.id != id);
        self.lessons.len() != before
    }

    /// Replace the contents, dropping repeated ids.
    pub fn set(&mut self, lessons: Vec<Lesson>) {
        self.lessons.clear();
        for l in lessons {
            if !self.contains(&l.id) {
                self.lessons.push(l);
            }
        }
    }

    pub fn clear(&mut self) {
        self.lessons.clear();
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn ids(&self) -> Vec<String> {
        self.lessons.iter().map(|l| l.id.clone()).collect()
    }

    pub fn total_minutes(&self) -> u32 {
        self.lessons.iter().map(Lesson::duration_minutes).fold(0u32, u32::saturating_add)
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }
}

/// Per-client builder state.
#[derive(Clone, Debug)]
pub struct CourseSession {
    pub selection: Selection,
    description: String,
    edited: bool,
    /// Preferred UI language code ("en", "da", ...).
    pub ui_language: String,
    pub filter: LessonFilter,
    pub page: usize,
}

impl Default for CourseSession {
    fn default() -> Self {
        Self {
            selection: Selection::default(),
            description: String::new(),
            edited: false,
            ui_language: "en".into(),
            filter: LessonFilter::default(),
            page: 1,
        }
    }
}

impl CourseSession {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_description_edited(&self) -> bool {
        self.edited
    }

    /// Recompute the description from the selection, discarding manual edits.
    pub fn regenerate(&mut self, catalog: &Catalog, cfg: &CourseCfg) {
        self.description = describe(catalog, self.selection.lessons(), cfg);
        self.edited = false;
        debug!(target: "course", lessons = self.selection.lessons().len(), "Course description regenerated");
    }

    /// Store hand-written description text. It is kept until the next regenerate.
    pub fn edit_description(&mut self, text: String) {
        self.description = text;
        self.edited = true;
    }

    /// Toggle membership of `lesson` and refresh the description.
    pub fn toggle(&mut self, lesson: &Lesson, catalog: &Catalog, cfg: &CourseCfg) -> bool {
        let selected = self.selection.toggle(lesson);
        self.regenerate(catalog, cfg);
        selected
    }

    pub fn remove(&mut self, id: &str, catalog: &Catalog, cfg: &CourseCfg) -> bool {
        let removed = self.selection.remove(id);
        if removed {
            self.regenerate(catalog, cfg);
        }
        removed
    }

    /// Replace the selection (e.g. with assembler output) and refresh the description.
    pub fn replace(&mut self, lessons: Vec<Lesson>, catalog: &Catalog, cfg: &CourseCfg) {
        self.selection.set(lessons);
        self.regenerate(catalog, cfg);
    }

    pub fn reset(&mut self) {
        self.selection.clear();
        self.description.clear();
        self.edited = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds::seed_catalog;

    #[test]
    fn toggling_twice_restores_the_selection() {
        let c = seed_catalog();
        let mut s = Selection::default();
        s.toggle(&c.lessons[0]);
        s.toggle(&c.lessons[2]);
        let before = s.clone();

        assert!(s.toggle(&c.lessons[4]));
        assert!(!s.toggle(&c.lessons[4]));
        assert_eq!(s, before);

        assert!(!s.toggle(&c.lessons[0]));
        assert!(s.toggle(&c.lessons[0]));
        let mut a = s.ids();
        let mut b = before.ids();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn set_drops_duplicate_ids() {
        let c = seed_catalog();
        let mut s = Selection::default();
        s.set(vec![c.lessons[1].clone(), c.lessons[1].clone(), c.lessons[3].clone()]);
        assert_eq!(s.ids(), vec!["SEC002", "SEC004"]);
        assert_eq!(s.total_minutes(), 40);
    }

    #[test]
    fn manual_edits_survive_until_regenerate_or_selection_change() {
        let c = seed_catalog();
        let cfg = CourseCfg::default();
        let mut session = CourseSession::default();
        session.toggle(&c.lessons[0], &c, &cfg);
        let generated = session.description().to_string();
        assert!(!generated.is_empty());

        session.edit_description("My own words".into());
        assert_eq!(session.description(), "My own words");
        assert!(session.is_description_edited());

        session.regenerate(&c, &cfg);
        assert_eq!(session.description(), generated);
        assert!(!session.is_description_edited());

        session.edit_description("again".into());
        session.toggle(&c.lessons[1], &c, &cfg);
        assert_ne!(session.description(), "again");
    }

    #[test]
    fn removing_last_lesson_clears_description() {
        let c = seed_catalog();
        let cfg = CourseCfg::default();
        let mut session = CourseSession::default();
        session.toggle(&c.lessons[0], &c, &cfg);
        assert!(session.remove("SEC001", &c, &cfg));
        assert_eq!(session.description(), "");
        assert!(!session.remove("SEC001", &c, &cfg));
    }
}
