// Shared by both backends; kept in sync with migrations/{sqlite,postgres}.

diesel::table! {
    posts (id) {
        id -> Text,
        timestamp -> Text,
        datetime -> Text,
        content -> Text,
        created_at -> Nullable<Timestamp>,
    }
}
