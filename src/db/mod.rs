//! Manage database connections and domain queries.
//!
//! This module tree exposes helpers for creating pooled Diesel
//! connections, running embedded migrations, and executing application
//! queries grouped by domain concerns.

mod admins;
mod connection;
mod insert;
mod messages;
mod migrations;
mod posts;
mod reports;
mod students;


pub use self::{
    admins::{create_admin, get_admin_by_email, set_admin_password},
    connection::{Backend, DbConnection, DbPool, MIGRATIONS, establish_pool},
    messages::{Participant, conversation, create_message, messages_for_participant},
    migrations::{SchemaError, run_migrations},
    posts::{
        add_comment, comments_for_posts, count_comments, create_post, delete_post, get_post,
        increment_likes, increment_shares, list_posts,
    },
    reports::{StudentBreakdown, student_breakdown},
    students::{
        DuplicateField, create_student, delete_student, find_duplicate_field,
        find_student_by_identifier, get_student, list_students, search_students,
        set_student_password, set_student_status, update_student_profile,
    },
};
