use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Serialize, Deserialize, Debug)]
pub struct Admin {
    pub id: i32,
    pub email: String,
    pub password: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::admins)]
pub struct NewAdmin<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Serialize, Deserialize, Debug, Clone)]
pub struct Student {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub student_id: String,
    pub email: String,
    pub password: String,
    pub department: String,
    pub course: String,
    pub year_level: String,
    pub award_number: String,
    pub place: String,
    pub photo: Option<String>,
    pub is_indigenous: bool,
    pub is_pwd: bool,
    pub status: String,
    pub application_status: String,
    pub registered_date: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::students)]
pub struct NewStudent<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub student_id: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub department: &'a str,
    pub course: &'a str,
    pub year_level: &'a str,
    pub award_number: &'a str,
    pub place: &'a str,
    pub is_indigenous: bool,
    pub is_pwd: bool,
    pub status: &'a str,
    pub application_status: &'a str,
    pub registered_date: NaiveDateTime,
}

/// Profile fields an administrator may edit in place.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::students)]
pub struct StudentProfileUpdate<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub course: &'a str,
    pub year_level: &'a str,
    pub department: &'a str,
    pub place: &'a str,
    pub is_indigenous: bool,
    pub is_pwd: bool,
}

#[derive(Queryable, Serialize, Deserialize, Debug, Clone)]
pub struct Post {
    pub id: i32,
    pub content: String,
    pub kind: String,
    pub audience: String,
    pub course: Option<String>,
    pub layout: String,
    pub images: Option<String>,
    pub author: String,
    pub likes: i32,
    pub shares: i32,
    pub created_at: Option<NaiveDateTime>,
    pub legacy_timestamp: Option<NaiveDateTime>,
    pub legacy_comments: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::posts)]
pub struct NewPost<'a> {
    pub content: &'a str,
    pub kind: &'a str,
    pub audience: &'a str,
    pub course: Option<&'a str>,
    pub layout: &'a str,
    pub images: Option<&'a str>,
    pub author: &'a str,
    pub likes: i32,
    pub shares: i32,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Queryable, Serialize, Deserialize, Debug, Clone)]
pub struct Comment {
    pub id: i32,
    pub post_id: i32,
    pub author: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::post_comments)]
pub struct NewComment<'a> {
    pub post_id: i32,
    pub author: &'a str,
    pub content: &'a str,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Serialize, Deserialize, Debug, Clone)]
pub struct Message {
    pub id: i32,
    pub sender_id: i32,
    pub sender_role: String,
    pub receiver_id: i32,
    pub receiver_role: String,
    pub content: String,
    pub attachment: Option<String>,
    pub attachment_name: Option<String>,
    pub read_status: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::messages)]
pub struct NewMessage<'a> {
    pub sender_id: i32,
    pub sender_role: &'a str,
    pub receiver_id: i32,
    pub receiver_role: &'a str,
    pub content: &'a str,
    pub attachment: Option<&'a str>,
    pub attachment_name: Option<&'a str>,
    pub read_status: bool,
    pub created_at: NaiveDateTime,
}
