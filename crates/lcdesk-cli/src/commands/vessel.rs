//! `lcdesk vessel` command.

use anyhow::Result;
use colored::Colorize;

use super::App;

pub async fn run(app: &App, mmsi: &str) -> Result<()> {
    let position = app.vessel_client().position(mmsi).await?;

    println!("MMSI:      {}", position.mmsi.to_string().bold());
    println!("status:    {}", position.status_text());
    println!("position:  {:.5}, {:.5}", position.lat, position.lng);
    println!("course:    {:.1}°", position.cog);
    println!("speed:     {:.1} kn", position.sog);
    println!("heading:   {:.1}°", position.hdt);
    if !position.ts.is_empty() {
        println!("reported:  {}", position.ts);
    }
    if !position.valid {
        println!("{}", "warning: position report flagged invalid".yellow());
    }
    Ok(())
}
