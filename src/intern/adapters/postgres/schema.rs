//! Diesel schema for user persistence.

diesel::table! {
    /// User accounts for administrators and interns.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Normalized email address.
        #[max_length = 320]
        email -> Varchar,
        /// Account role.
        #[max_length = 20]
        role -> Varchar,
        /// Registration approval status.
        #[max_length = 20]
        approval_status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
