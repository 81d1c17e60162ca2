//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Title, carrying the reassignment marker when reassigned.
        #[max_length = 255]
        title -> Varchar,
        /// Free-form description.
        description -> Text,
        /// Priority.
        #[max_length = 20]
        priority -> Varchar,
        /// Delivery deadline.
        deadline -> Timestamptz,
        /// Assigned intern.
        assignee_id -> Uuid,
        /// Creating administrator.
        creator_id -> Uuid,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Reason supplied when declining.
        decline_reason -> Nullable<Text>,
        /// Feedback from the latest review.
        review_feedback -> Nullable<Text>,
        /// Creation timestamp; restarted by reassignment.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Count of committed writes, compared on every update.
        lock_version -> Int4,
    }
}

diesel::table! {
    /// Work and pause intervals.
    time_logs (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Owning task.
        task_id -> Uuid,
        /// Recorded activity.
        #[max_length = 20]
        kind -> Varchar,
        /// Interval start.
        started_at -> Timestamptz,
        /// Interval end; null while open.
        ended_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Deliverables attached for review.
    submissions (id) {
        /// Submission identifier.
        id -> Uuid,
        /// Owning task.
        task_id -> Uuid,
        /// Deliverable kind.
        #[max_length = 20]
        kind -> Varchar,
        /// Deliverable URL.
        url -> Text,
        /// Attachment timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(time_logs -> tasks (task_id));
diesel::joinable!(submissions -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, time_logs, submissions);
