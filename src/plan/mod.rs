pub(crate) mod render_plan;
