use lapwatch::{Config, ProgramError};

#[tokio::main]
async fn main() -> Result<(), ProgramError> {
    let config = Config::from_env()?;
    lapwatch::logging::init(&config)?;

    let app = lapwatch::run(config).await?;

    let store = app.store();
    if store.has_started() {
        println!("Total: {}", store.main_display());
        for lap in store.lap_view().iter().rev() {
            println!("{}", lap.text);
        }
    }
    Ok(())
}
