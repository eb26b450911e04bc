mod discussions_test;
mod feedback_test;
mod middleware_test;
