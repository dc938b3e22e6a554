pub mod timetable_client;
