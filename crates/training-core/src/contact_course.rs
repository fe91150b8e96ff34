//! Read-only view of the courses each contact is attached to, through a job.

use crate::database::Database;
use crate::error::Result;
use crate::types::{ContactId, CourseId, JobId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactCourse {
    /// Row id; the job id, as in the course/job relation.
    pub id: JobId,
    pub function: Option<String>,
    pub course: CourseId,
    pub job: JobId,
    pub contact: ContactId,
}

/// One row per (course, job) pair of the course/job relation.
pub fn rows(db: &Database) -> Result<Vec<ContactCourse>> {
    let mut rows = Vec::new();
    for course in &db.courses {
        for job_id in &course.job_ids {
            let job = db.job(*job_id)?;
            rows.push(ContactCourse {
                id: job.id,
                function: job.function.clone(),
                course: course.id,
                job: job.id,
                contact: job.contact,
            });
        }
    }
    Ok(rows)
}

/// The contact's courses.
pub fn courses_for_contact(db: &Database, contact: ContactId) -> Result<Vec<ContactCourse>> {
    db.contact(contact)?;
    Ok(rows(db)?
        .into_iter()
        .filter(|row| row.contact == contact)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrainingError;

    #[test]
    fn lists_courses_through_jobs() {
        let mut db = Database::new();
        let ada = db.add_contact("Ada");
        let bob = db.add_contact("Bob");
        let ada_trainer = db.add_job(ada, Some("Trainer".into()), None).unwrap();
        let ada_buyer = db.add_job(ada, Some("Buyer".into()), None).unwrap();
        let bob_job = db.add_job(bob, None, None).unwrap();
        let rust = db.add_course("Rust");
        let sql = db.add_course("SQL");
        db.attach_job(rust, ada_trainer).unwrap();
        db.attach_job(sql, ada_buyer).unwrap();
        db.attach_job(sql, bob_job).unwrap();
        assert!(!db.attach_job(sql, bob_job).unwrap());

        let ada_rows = courses_for_contact(&db, ada).unwrap();
        assert_eq!(ada_rows.len(), 2);
        assert_eq!(ada_rows[0].course, rust);
        assert_eq!(ada_rows[0].function.as_deref(), Some("Trainer"));
        assert_eq!(ada_rows[1].course, sql);

        assert_eq!(rows(&db).unwrap().len(), 3);
    }

    #[test]
    fn unknown_contact_fails() {
        let db = Database::new();
        assert!(matches!(
            courses_for_contact(&db, ContactId(9)),
            Err(TrainingError::ContactNotFound(_))
        ));
    }
}
