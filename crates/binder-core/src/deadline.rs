//! Deadline bucketing for the dashboard and the deadlines page.

use chrono::NaiveDate;
use serde::Serialize;

use crate::record::Deadline;

/// Deadlines split by status relative to a given day.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeadlineBuckets {
  /// Open and due before today, oldest first.
  pub overdue:   Vec<Deadline>,
  /// Open and due today or later, soonest first.
  pub upcoming:  Vec<Deadline>,
  /// Open with no due date.
  pub undated:   Vec<Deadline>,
  pub completed: Vec<Deadline>,
}

impl DeadlineBuckets {
  pub fn partition(deadlines: Vec<Deadline>, today: NaiveDate) -> Self {
    let mut buckets = Self::default();
    for d in deadlines {
      match (d.completed, d.due_date) {
        (true, _) => buckets.completed.push(d),
        (false, None) => buckets.undated.push(d),
        (false, Some(due)) if due < today => buckets.overdue.push(d),
        (false, Some(_)) => buckets.upcoming.push(d),
      }
    }
    buckets.overdue.sort_by_key(|d| d.due_date);
    buckets.upcoming.sort_by_key(|d| d.due_date);
    buckets
  }

  /// Number of deadlines still open.
  pub fn pending(&self) -> usize {
    self.overdue.len() + self.upcoming.len() + self.undated.len()
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::record::Priority;

  fn deadline(title: &str, due: Option<NaiveDate>, completed: bool) -> Deadline {
    Deadline {
      deadline_id: Uuid::new_v4(),
      case_id: Uuid::nil(),
      title: title.into(),
      due_date: due,
      description: None,
      priority: Priority::Medium,
      completed,
      completed_at: completed.then(Utc::now),
      created_at: Utc::now(),
    }
  }

  #[test]
  fn completed_deadlines_leave_upcoming_and_overdue() {
    let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
    let yesterday = today.pred_opt();
    let next_week = NaiveDate::from_ymd_opt(2024, 5, 17);

    let buckets = DeadlineBuckets::partition(
      vec![
        deadline("late", yesterday, false),
        deadline("soon", next_week, false),
        deadline("today", Some(today), false),
        deadline("done-late", yesterday, true),
        deadline("done-soon", next_week, true),
        deadline("someday", None, false),
      ],
      today,
    );

    let titles =
      |v: &[Deadline]| v.iter().map(|d| d.title.clone()).collect::<Vec<_>>();
    assert_eq!(titles(&buckets.overdue), vec!["late"]);
    assert_eq!(titles(&buckets.upcoming), vec!["today", "soon"]);
    assert_eq!(titles(&buckets.undated), vec!["someday"]);
    assert_eq!(buckets.completed.len(), 2);
    assert_eq!(buckets.pending(), 4);
  }
}
