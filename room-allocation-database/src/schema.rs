// Tables of the existing office database, the allocation never changes their layout.

diesel::table! {
    weekly_preferences (id) {
        id -> Int4,
        #[max_length = 255]
        team_name -> Varchar,
        #[max_length = 255]
        contact_person -> Nullable<Varchar>,
        team_size -> Nullable<Int4>,
        #[max_length = 255]
        preferred_days -> Nullable<Varchar>,
        week_monday -> Nullable<Date>,
        submission_time -> Nullable<Timestamp>,
    }
}

diesel::table! {
    oasis_preferences (id) {
        id -> Int4,
        #[max_length = 255]
        person_name -> Varchar,
        #[max_length = 50]
        preferred_day_1 -> Nullable<Varchar>,
        #[max_length = 50]
        preferred_day_2 -> Nullable<Varchar>,
        #[max_length = 50]
        preferred_day_3 -> Nullable<Varchar>,
        #[max_length = 50]
        preferred_day_4 -> Nullable<Varchar>,
        #[max_length = 50]
        preferred_day_5 -> Nullable<Varchar>,
        week_monday -> Nullable<Date>,
        submission_time -> Nullable<Timestamp>,
    }
}

diesel::table! {
    weekly_allocations (id) {
        id -> Int4,
        #[max_length = 255]
        team_name -> Varchar,
        #[max_length = 255]
        room_name -> Varchar,
        date -> Date,
    }
}

diesel::table! {
    oasis_allocations (id) {
        id -> Int4,
        #[max_length = 255]
        person_name -> Varchar,
        date -> Date,
    }
}

diesel::table! {
    admin_settings (setting_key) {
        #[max_length = 255]
        setting_key -> Varchar,
        setting_value -> Nullable<Text>,
        updated_at -> Nullable<Timestamp>,
    }
}
