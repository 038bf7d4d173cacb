diesel::table! {
    admins (id) {
        id -> Integer,
        email -> Text,
        password -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    students (id) {
        id -> Integer,
        first_name -> Text,
        last_name -> Text,
        student_id -> Text,
        email -> Text,
        password -> Text,
        department -> Text,
        course -> Text,
        year_level -> Text,
        award_number -> Text,
        place -> Text,
        photo -> Nullable<Text>,
        is_indigenous -> Bool,
        is_pwd -> Bool,
        status -> Text,
        application_status -> Text,
        registered_date -> Timestamp,
    }
}

diesel::table! {
    posts (id) {
        id -> Integer,
        content -> Text,
        kind -> Text,
        audience -> Text,
        course -> Nullable<Text>,
        layout -> Text,
        images -> Nullable<Text>,
        author -> Text,
        likes -> Integer,
        shares -> Integer,
        created_at -> Nullable<Timestamp>,
        legacy_timestamp -> Nullable<Timestamp>,
        legacy_comments -> Nullable<Text>,
    }
}

diesel::table! {
    post_comments (id) {
        id -> Integer,
        post_id -> Integer,
        author -> Text,
        content -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    messages (id) {
        id -> Integer,
        sender_id -> Integer,
        sender_role -> Text,
        receiver_id -> Integer,
        receiver_role -> Text,
        content -> Text,
        attachment -> Nullable<Text>,
        attachment_name -> Nullable<Text>,
        read_status -> Bool,
        created_at -> Timestamp,
    }
}

diesel::allow_tables_to_appear_in_same_query!(posts, post_comments);
