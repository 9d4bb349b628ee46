pub mod fixtures;

#[cfg(test)]
mod attendance_tests;
#[cfg(test)]
mod exam_tests;
#[cfg(test)]
mod notification_tests;
#[cfg(test)]
mod analytics_tests;
#[cfg(test)]
mod message_tests;
