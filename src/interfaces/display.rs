use crate::domain::session::{SessionSnapshot, SessionState, Status};
use crate::error::Result;
use std::io::Write;
use tokio::sync::watch;

/// A presentation of the session read model.
pub trait Renderer: Send {
    fn render(&mut self, snapshot: &SessionSnapshot) -> Result<()>;
}

/// The screen text the machine shows for a snapshot.
pub fn describe(snapshot: &SessionSnapshot) -> String {
    let item = snapshot.selected_item.as_ref();
    match (snapshot.status, item) {
        (Status::SelectItems, None) => "상품을 선택해주세요".to_string(),
        (Status::SelectItems, Some(item)) => {
            format!("결제 방법을 선택해주세요 [{} {}]", item.name, item.price)
        }
        (Status::PayWithCard, _) => "카드를 넣어주세요".to_string(),
        (Status::PayWithCash, _) => format!("현금을 넣어주세요 {}", snapshot.cash_amount),
        (Status::ProcessingPayment, _) => "결제 진행중...".to_string(),
        (Status::PaymentSuccess, _) => "결제 성공".to_string(),
        (Status::PaymentFailed, _) => "결제 실패".to_string(),
        (Status::DispenseItem, Some(item)) if snapshot.change.is_positive() => format!(
            "상품이 나왔습니다: {} / 거스름돈 {}",
            item.name, snapshot.change
        ),
        (Status::DispenseItem, Some(item)) => format!("상품이 나왔습니다: {}", item.name),
        (Status::DispenseItem, None) => "상품이 나왔습니다".to_string(),
    }
}

/// Writes [`describe`] output, one line per snapshot.
pub struct TextRenderer<W: Write> {
    sink: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write + Send> Renderer for TextRenderer<W> {
    fn render(&mut self, snapshot: &SessionSnapshot) -> Result<()> {
        writeln!(self.sink, "{}", describe(snapshot))?;
        self.sink.flush()?;
        Ok(())
    }
}

/// Renders the current state, then every change, until the session is dropped.
pub async fn follow(
    mut updates: watch::Receiver<SessionState>,
    mut renderer: Box<dyn Renderer>,
) -> Result<()> {
    let snapshot = updates.borrow_and_update().snapshot();
    renderer.render(&snapshot)?;

    while updates.changed().await.is_ok() {
        let snapshot = updates.borrow_and_update().snapshot();
        renderer.render(&snapshot)?;
    }
    Ok(())
}
