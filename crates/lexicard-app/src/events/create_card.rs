use lexicard_anki::{AddReport, AnkiPort};
use lexicard_config::Config;
use lexicard_ui::{ScreenBuffer, Status};

/// Turn every selection of every screen into a note, then open the new
/// notes in Anki's browser.
pub async fn handle_card_creation<P>(port: &P, config: &Config, buffer: &mut ScreenBuffer)
where
    P: AnkiPort + ?Sized,
{
    let selections = buffer.selections();
    if selections.is_empty() {
        buffer.status_mut().error("Nothing selected", None);
        return;
    }

    tracing::debug!("Creating {} cards", selections.len());
    match lexicard_anki::add_cards(port, config, &selections).await {
        Ok(report) => {
            report_cards(buffer.status_mut(), &report);
            if report.added.is_empty() {
                return;
            }
            let query = lexicard_anki::browse_query(&report.added);
            if let Err(e) = port.browse(&query).await {
                buffer.status_mut().error(e.label(), Some(&e.to_string()));
            }
        }
        Err(e) => {
            tracing::error!("Card creation failed: {e}");
            buffer.status_mut().error(e.label(), Some(&e.to_string()));
        }
    }
}

pub fn report_cards(status: &mut Status, report: &AddReport) {
    for (phrase, error) in &report.failed {
        status.error(error.label(), Some(&format!("{phrase}: {error}")));
    }
    match report.added.len() {
        0 => {}
        1 => status.success("Card added", None),
        n => status.success(&format!("{n} cards added"), None),
    }
}
