//! Wire-format adapters for the unmodified browser client.
//!
//! Core models keep one canonical field per concept; the client grew up
//! against responses that duplicate several of them (`created_at` and
//! `timestamp`, comment `content` and `text`, camelCase student fields
//! with snake_case twins). These types reproduce those shapes at the
//! HTTP boundary so nothing inside `db` or `models` has to.

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

use crate::{
    compat::{self, LegacyComment},
    models::{Comment, Message, Post, Student},
};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn format_instant(instant: NaiveDateTime) -> String {
    instant.format(DATE_FORMAT).to_string()
}

#[derive(Debug, Serialize)]
pub struct CommentWire {
    pub id: Value,
    pub author: String,
    pub content: String,
    pub text: String,
    pub timestamp: String,
    pub created_at: String,
}

impl CommentWire {
    /// Render a stored comment row.
    #[must_use]
    pub fn from_row(comment: &Comment) -> Self {
        let stamp = format_instant(comment.created_at);
        Self {
            id: Value::from(comment.id),
            author: comment.author.clone(),
            content: comment.content.clone(),
            text: comment.content.clone(),
            timestamp: stamp.clone(),
            created_at: stamp,
        }
    }

    /// Render a comment recovered from a legacy engagement blob.
    #[must_use]
    pub fn from_legacy(comment: LegacyComment) -> Self {
        let stamp = comment.created_at.unwrap_or_default();
        Self {
            id: comment.id,
            author: comment.author,
            content: comment.content.clone(),
            text: comment.content,
            timestamp: stamp.clone(),
            created_at: stamp,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostWire {
    pub id: i32,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub audience: String,
    pub course: Option<String>,
    pub layout: String,
    pub author: String,
    pub images: Vec<String>,
    pub likes: i32,
    pub shares: i32,
    pub comments: Vec<CommentWire>,
    pub comments_count: i64,
    pub created_at: String,
    pub timestamp: String,
}

/// A post's effective creation instant, with legacy fallbacks applied.
#[must_use]
pub fn post_instant(post: &Post) -> NaiveDateTime {
    compat::effective_created_at(post.created_at, post.legacy_timestamp)
}

/// Render a post with its stored comments merged after any legacy ones.
#[must_use]
pub fn post_to_wire(post: Post, comment_rows: &[Comment]) -> PostWire {
    let stamp = format_instant(post_instant(&post));
    let legacy = compat::decode_legacy_comments(post.legacy_comments.as_deref());
    let legacy_count = legacy.count();
    let mut comments: Vec<CommentWire> = legacy
        .into_list()
        .into_iter()
        .map(CommentWire::from_legacy)
        .collect();
    comments.extend(comment_rows.iter().map(CommentWire::from_row));
    let comments_count = legacy_count + comment_rows.len() as i64;
    PostWire {
        id: post.id,
        content: post.content,
        kind: post.kind,
        audience: post.audience,
        course: post.course,
        layout: post.layout,
        author: post.author,
        images: compat::decode_images(post.images.as_deref()),
        likes: post.likes,
        shares: post.shares,
        comments,
        comments_count,
        created_at: stamp.clone(),
        timestamp: stamp,
    }
}

#[derive(Debug, Serialize)]
pub struct StudentWire {
    pub id: i32,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "studentId")]
    pub student_id: String,
    pub email: String,
    pub department: String,
    pub course: String,
    pub year: String,
    #[serde(rename = "yearLevel")]
    pub year_level: String,
    pub status: String,
    pub student_status: String,
    #[serde(rename = "awardNumber")]
    pub award_number_camel: String,
    pub award_number: String,
    pub place: String,
    #[serde(rename = "from")]
    pub from_place: String,
    pub origin: String,
    #[serde(rename = "isIndigenous")]
    pub is_indigenous_camel: bool,
    pub is_indigenous: bool,
    #[serde(rename = "isPwd")]
    pub is_pwd_camel: bool,
    pub is_pwd: bool,
}

impl StudentWire {
    #[must_use]
    pub fn from_row(student: &Student) -> Self {
        Self {
            id: student.id,
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            student_id: student.student_id.clone(),
            email: student.email.clone(),
            department: student.department.clone(),
            course: student.course.clone(),
            year: student.year_level.clone(),
            year_level: student.year_level.clone(),
            status: student.status.clone(),
            student_status: student.status.clone(),
            award_number_camel: student.award_number.clone(),
            award_number: student.award_number.clone(),
            place: student.place.clone(),
            from_place: student.place.clone(),
            origin: student.place.clone(),
            is_indigenous_camel: student.is_indigenous,
            is_indigenous: student.is_indigenous,
            is_pwd_camel: student.is_pwd,
            is_pwd: student.is_pwd,
        }
    }
}

/// Profile payload embedded in a student login response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfileWire {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub student_id: String,
    pub email: String,
    pub award_number: String,
    pub department: String,
    pub course: String,
    pub year: String,
    pub place: String,
    pub photo: Option<String>,
    pub is_indigenous: bool,
    pub is_pwd: bool,
    pub status: String,
    pub application_status: String,
    pub registered: String,
}

impl StudentProfileWire {
    #[must_use]
    pub fn from_row(student: &Student) -> Self {
        Self {
            id: student.id,
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            student_id: student.student_id.clone(),
            email: student.email.clone(),
            award_number: student.award_number.clone(),
            department: student.department.clone(),
            course: student.course.clone(),
            year: student.year_level.clone(),
            place: student.place.clone(),
            photo: student.photo.clone(),
            is_indigenous: student.is_indigenous,
            is_pwd: student.is_pwd,
            status: student.status.clone(),
            application_status: student.application_status.clone(),
            registered: format_instant(student.registered_date),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageWire {
    pub id: i32,
    pub sender_id: i32,
    pub receiver_id: i32,
    pub sender_type: String,
    pub receiver_type: String,
    pub content: String,
    pub attachment: Option<String>,
    pub attachment_name: Option<String>,
    pub read_status: bool,
    pub created_at: String,
}

impl MessageWire {
    #[must_use]
    pub fn from_row(message: &Message) -> Self {
        Self {
            id: message.id,
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            sender_type: message.sender_role.clone(),
            receiver_type: message.receiver_role.clone(),
            content: message.content.clone(),
            attachment: message.attachment.clone(),
            attachment_name: message.attachment_name.clone(),
            read_status: message.read_status,
            created_at: message.created_at.format(DATE_FORMAT).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::rstest;

    use super::*;

    fn sample_post() -> Post {
        Post {
            id: 1,
            content: "Hello".to_owned(),
            kind: "text".to_owned(),
            audience: "students".to_owned(),
            course: None,
            layout: "image-left".to_owned(),
            images: Some(r#"["a.png"]"#.to_owned()),
            author: "Administrator".to_owned(),
            likes: 2,
            shares: 1,
            created_at: NaiveDate::from_ymd_opt(2024, 5, 1).and_then(|d| d.and_hms_opt(8, 30, 0)),
            legacy_timestamp: None,
            legacy_comments: None,
        }
    }

    #[rstest]
    fn post_wire_duplicates_timestamp_fields() {
        let wire = post_to_wire(sample_post(), &[]);
        let value = serde_json::to_value(&wire).expect("serialise");
        assert_eq!(value["created_at"], value["timestamp"]);
        assert_eq!(value["created_at"], "2024-05-01 08:30:00");
        assert_eq!(value["type"], "text");
        assert_eq!(value["images"][0], "a.png");
    }

    #[rstest]
    fn post_wire_merges_legacy_and_stored_comments() {
        let mut post = sample_post();
        post.legacy_comments = Some(r#"[{"id":1, "author":"Old", "content":"first"}]"#.to_owned());
        let stamp = NaiveDate::from_ymd_opt(2024, 5, 2)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .expect("valid instant");
        let rows = vec![Comment {
            id: 10,
            post_id: 1,
            author: "Jane".to_owned(),
            content: "second".to_owned(),
            created_at: stamp,
        }];
        let wire = post_to_wire(post, &rows);
        assert_eq!(wire.comments_count, 2);
        assert_eq!(wire.comments[0].author, "Old");
        assert_eq!(wire.comments[1].author, "Jane");
        assert_eq!(wire.comments[1].content, wire.comments[1].text);
    }

    #[rstest]
    fn post_wire_counts_legacy_numeric_blob() {
        let mut post = sample_post();
        post.legacy_comments = Some("3".to_owned());
        let wire = post_to_wire(post, &[]);
        assert_eq!(wire.comments_count, 3);
        assert!(wire.comments.is_empty());
    }

    #[rstest]
    fn student_wire_duplicates_naming_variants() {
        let student = Student {
            id: 4,
            first_name: "Juan".to_owned(),
            last_name: "Dela Cruz".to_owned(),
            student_id: "2021-0001".to_owned(),
            email: "a@b.com".to_owned(),
            password: "hash".to_owned(),
            department: "Engineering".to_owned(),
            course: "BSCE".to_owned(),
            year_level: "2nd Year".to_owned(),
            award_number: "AW-1".to_owned(),
            place: "Iloilo".to_owned(),
            photo: None,
            is_indigenous: true,
            is_pwd: false,
            status: "active".to_owned(),
            application_status: "pending".to_owned(),
            registered_date: NaiveDate::from_ymd_opt(2024, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .expect("valid instant"),
        };
        let value = serde_json::to_value(StudentWire::from_row(&student)).expect("serialise");
        assert_eq!(value["year"], value["yearLevel"]);
        assert_eq!(value["awardNumber"], value["award_number"]);
        assert_eq!(value["place"], value["from"]);
        assert_eq!(value["place"], value["origin"]);
        assert_eq!(value["isIndigenous"], value["is_indigenous"]);
        assert_eq!(value["status"], value["student_status"]);
    }
}
