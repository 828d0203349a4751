//! Diesel schema definitions.

diesel::table! {
    messages (id) {
        id -> Int8,
        guild_id -> Int8,
        channel_id -> Int8,
        author_id -> Int8,
        content -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    subscriptions (id) {
        id -> Int4,
        user_id -> Int8,
        guild_id -> Int8,
        email -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    cooldowns (guild_id) {
        guild_id -> Int8,
        last_sent_at -> Timestamptz,
    }
}

diesel::table! {
    guild_modes (guild_id) {
        guild_id -> Int8,
        dev_mode -> Bool,
    }
}

diesel::table! {
    excluded_channels (id) {
        id -> Int4,
        guild_id -> Int8,
        channel_id -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    messages,
    subscriptions,
    cooldowns,
    guild_modes,
    excluded_channels,
);
