// Manual schema definition, kept in sync with migrations/*.sql

diesel::table! {
    users (id) {
        id -> Integer,
        email -> Text,
        username -> Text,
        password -> Text,
        planet -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    items (id) {
        id -> Integer,
        name -> Text,
        #[sql_name = "type"]
        kind -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    characters (id) {
        id -> Integer,
        uid -> Integer,
        height -> Nullable<Text>,
        gender -> Nullable<Text>,
        mass -> Nullable<Text>,
        birth_year -> Nullable<Text>,
        eye_color -> Nullable<Text>,
        skin_color -> Nullable<Text>,
    }
}

diesel::table! {
    planets (id) {
        id -> Integer,
        uid -> Integer,
        population -> Nullable<Text>,
        terrain -> Nullable<Text>,
        diameter -> Nullable<Text>,
        climate -> Nullable<Text>,
        gravity -> Nullable<Text>,
    }
}

diesel::table! {
    favorites (id) {
        id -> Integer,
        user_id -> Integer,
        item_id -> Integer,
        created_at -> Timestamp,
    }
}

// Extension tables share their primary key with `items`
diesel::joinable!(characters -> items (id));
diesel::joinable!(planets -> items (id));
diesel::joinable!(favorites -> users (user_id));
diesel::joinable!(favorites -> items (item_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    items,
    characters,
    planets,
    favorites,
);
