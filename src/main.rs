fn main() -> anyhow::Result<()> {
    exam_planner_lib::run()?;
    Ok(())
}
