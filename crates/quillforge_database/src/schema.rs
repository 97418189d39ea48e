//! Diesel table definitions.

diesel::table! {
    content_revisions (id) {
        id -> Uuid,
        lineage_id -> Uuid,
        organization_id -> Uuid,
        created_by -> Uuid,
        style_profile_id -> Nullable<Uuid>,
        title -> Text,
        brief -> Nullable<Text>,
        content_type -> Text,
        body -> Text,
        word_count -> Int4,
        character_count -> Int4,
        version -> Int4,
        is_current -> Bool,
        input_tokens -> Int8,
        output_tokens -> Int8,
        total_tokens -> Int8,
        estimated_cost -> Float8,
        model -> Text,
        prompt -> Nullable<Text>,
        status -> Text,
        is_archived -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    edit_records (id) {
        id -> Uuid,
        lineage_id -> Uuid,
        revision_id -> Uuid,
        edited_by -> Uuid,
        sequence -> Int4,
        instruction -> Text,
        category -> Text,
        previous_text -> Text,
        new_text -> Text,
        diff_summary -> Text,
        diff_lines -> Jsonb,
        previous_word_count -> Int4,
        new_word_count -> Int4,
        word_count_delta -> Int4,
        previous_character_count -> Int4,
        new_character_count -> Int4,
        character_count_delta -> Int4,
        input_tokens -> Int8,
        output_tokens -> Int8,
        total_tokens -> Int8,
        estimated_cost -> Float8,
        model -> Text,
        status -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    usage_entries (id) {
        id -> Uuid,
        organization_id -> Uuid,
        actor_id -> Nullable<Uuid>,
        service -> Text,
        operation -> Text,
        input_tokens -> Int8,
        output_tokens -> Int8,
        total_tokens -> Int8,
        input_cost -> Float8,
        output_cost -> Float8,
        total_cost -> Float8,
        model -> Text,
        input_cost_per_1k -> Float8,
        output_cost_per_1k -> Float8,
        request_id -> Nullable<Text>,
        response_time_ms -> Nullable<Int8>,
        success -> Text,
        usage_date -> Date,
        usage_hour -> Int2,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(content_revisions, edit_records);
