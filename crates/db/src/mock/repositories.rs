use chrono::{NaiveDate, NaiveTime};
use mockall::mock;
use uuid::Uuid;

use crate::models::{DbAdvisor, DbReservation};

// Mock repositories for testing
mock! {
    pub ReservationRepo {
        pub async fn create_reservation(
            &self,
            date: NaiveDate,
            slot: NaiveTime,
            duration_minutes: i32,
            student_id: Uuid,
            advisor_id: Uuid,
            note: Option<&'static str>,
            meeting_url: &'static str,
        ) -> eyre::Result<Option<DbReservation>>;

        pub async fn get_reservation_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbReservation>>;

        pub async fn get_reserved_slots(
            &self,
            date: NaiveDate,
        ) -> eyre::Result<Vec<NaiveTime>>;

        pub async fn get_reservations_by_date(
            &self,
            date: NaiveDate,
        ) -> eyre::Result<Vec<DbReservation>>;

        pub async fn get_reservations_in_range(
            &self,
            from: NaiveDate,
            to: NaiveDate,
        ) -> eyre::Result<Vec<DbReservation>>;

        pub async fn get_reservations_by_student(
            &self,
            student_id: Uuid,
        ) -> eyre::Result<Vec<DbReservation>>;

        pub async fn get_reservations_by_advisor(
            &self,
            advisor_id: Uuid,
        ) -> eyre::Result<Vec<DbReservation>>;

        pub async fn cancel_reservation(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbReservation>>;
    }
}

mock! {
    pub AdvisorRepo {
        pub async fn create_advisor(
            &self,
            display_name: &'static str,
            email: &'static str,
        ) -> eyre::Result<DbAdvisor>;

        pub async fn get_advisor_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbAdvisor>>;

        pub async fn least_loaded_advisor(
            &self,
            date: NaiveDate,
        ) -> eyre::Result<Option<Uuid>>;
    }
}
