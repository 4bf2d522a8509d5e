//! Seed data: the built-in sample catalog used by the in-memory source.

use crate::domain::{Catalog, Difficulty, Lesson, TopicRef};

fn lesson(
  id: &str,
  title: &str,
  description: &str,
  topics: &[usize],
  minutes: u32,
  difficulty: Difficulty,
  languages: &[usize],
) -> Lesson {
  Lesson {
    id: id.into(),
    title: title.into(),
    description: description.into(),
    topics: topics.iter().map(|&i| TopicRef::Index(i)).collect(),
    video_length: format!("{}:00", minutes / 2),
    duration: minutes.to_string(),
    difficulty: Some(difficulty),
    quiz_questions: "5".into(),
    available_languages: languages.to_vec(),
    thumb_image: format!("/thumbs/{}.png", id.to_lowercase()),
  }
}

/// Small catalog that keeps the app useful without a lessons file.
pub fn seed_catalog() -> Catalog {
  Catalog {
    topics: vec![
      "Passwords".into(),
      "Phishing".into(),
      "GDPR".into(),
      "Social Engineering".into(),
      "Malware".into(),
    ],
    languages: vec!["English".into(), "Danish".into(), "German".into()],
    lessons: vec![
      lesson("SEC001", "Strong Passwords", "Build passphrases that are easy to remember and hard to guess.", &[0], 15, Difficulty::Basic, &[0, 1]),
      lesson("SEC002", "Spotting Phishing Emails", "Recognise forged senders, urgent tone and suspicious links.", &[1, 3], 20, Difficulty::Basic, &[0, 1, 2]),
      lesson("SEC003", "GDPR Essentials", "What personal data is and how to handle it lawfully.", &[2], 30, Difficulty::Intermediate, &[0, 2]),
      lesson("SEC004", "Password Managers", "Store and share credentials safely across devices.", &[0], 20, Difficulty::Intermediate, &[0]),
      lesson("SEC005", "Pretexting and Vishing", "Phone and in-person manipulation techniques and how to respond.", &[3], 25, Difficulty::Intermediate, &[0, 1]),
      lesson("SEC006", "Ransomware Response", "First steps when files are encrypted and a ransom note appears.", &[4], 35, Difficulty::Advanced, &[0]),
      lesson("SEC007", "Data Breach Reporting", "Deadlines and duties when personal data leaks.", &[2, 4], 25, Difficulty::Advanced, &[0, 1, 2]),
    ],
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn seed_catalog_has_no_dangling_refs() {
    let c = seed_catalog();
    for l in &c.lessons {
      assert!(c.dangling_refs(l).is_empty(), "{} has dangling refs", l.id);
      assert!(l.duration_minutes() > 0);
    }
  }
}
