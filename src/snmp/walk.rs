//! Обход поддерева постранично через GETBULK.
//!
//! Транспорт отдаёт одну страницу ответа (`PageSource`), а здесь решается,
//! когда обход закончен и как повторять неудачные запросы.

use anyhow::Result;
use async_trait::async_trait;
use tokio::time::timeout;

use super::oid::format_oid;
use super::{SessionOptions, SnmpValue, Varbind};

/// Строка страницы; `None` означает endOfMibView / noSuch*
pub type RawRow = (Vec<u64>, Option<SnmpValue>);

/// Источник страниц GETBULK
#[async_trait]
pub trait PageSource: Send {
    /// Одна страница, начиная со следующего за `from` OID
    async fn fetch(&mut self, from: &[u64]) -> Result<Vec<RawRow>>;

    /// Новая сессия вместо текущей. Вызывается перед повтором, чтобы
    /// запоздавший ответ на прошлый запрос не был принят за новый.
    async fn reset(&mut self) -> Result<()>;
}

/// Что делать после разбора страницы
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// Запросить следующую страницу начиная с этого OID
    Continue(Vec<u64>),
    Done,
}

/// Переносит строки страницы в `out` и решает, идти ли дальше.
///
/// Обход заканчивается на пустой странице, на выходе за поддерево `start`,
/// на endOfMibView и на OID, который не больше предыдущего.
pub fn absorb_page(
    start: &[u64],
    current: &[u64],
    batch: Vec<RawRow>,
    out: &mut Vec<Varbind>,
) -> Page {
    if batch.is_empty() {
        return Page::Done;
    }

    let mut last: Option<Vec<u64>> = None;
    for (oid, value) in batch {
        let previous = last.as_deref().unwrap_or(current);
        if !oid.starts_with(start) || oid.as_slice() <= previous {
            return Page::Done;
        }
        let Some(value) = value else {
            return Page::Done;
        };

        out.push(Varbind::new(format_oid(&oid), value));
        last = Some(oid);
    }

    match last {
        Some(oid) => Page::Continue(oid),
        None => Page::Done,
    }
}

/// Все строки под `start`. Каждый запрос ограничен `options.timeout`,
/// после неудачи сессия пересоздаётся и запрос повторяется до
/// `options.retries` раз.
pub async fn walk_subtree(
    source: &mut dyn PageSource,
    start: &[u64],
    options: &SessionOptions,
) -> Result<Vec<Varbind>> {
    let mut results = Vec::new();
    let mut current = start.to_vec();

    loop {
        let batch = fetch_with_retry(source, &current, options).await?;
        match absorb_page(start, &current, batch, &mut results) {
            Page::Continue(next) => current = next,
            Page::Done => return Ok(results),
        }
    }
}

async fn fetch_with_retry(
    source: &mut dyn PageSource,
    from: &[u64],
    options: &SessionOptions,
) -> Result<Vec<RawRow>> {
    let mut attempt = 0;

    loop {
        let err = match timeout(options.timeout, source.fetch(from)).await {
            Ok(Ok(rows)) => return Ok(rows),
            Ok(Err(e)) => e.context("SNMP GETBULK запрос не удался"),
            Err(_) => anyhow::anyhow!("Таймаут SNMP GETBULK ({:?})", options.timeout),
        };

        if attempt >= options.retries {
            return Err(err);
        }
        attempt += 1;
        tracing::debug!(attempt, error = %err, "повтор GETBULK");
        source.reset().await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::time::Duration;

    fn row(oid: &[u64], value: i64) -> RawRow {
        (oid.to_vec(), Some(SnmpValue::Integer(value)))
    }

    const ROOT: [u64; 4] = [1, 3, 6, 9];

    #[test]
    fn test_page_continues_from_last_oid() {
        let mut out = Vec::new();
        let page = absorb_page(
            &ROOT,
            &ROOT,
            vec![row(&[1, 3, 6, 9, 1], 10), row(&[1, 3, 6, 9, 2], 20)],
            &mut out,
        );
        assert_eq!(page, Page::Continue(vec![1, 3, 6, 9, 2]));
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].oid, "1.3.6.9.2");
    }

    #[test]
    fn test_empty_page_ends_walk() {
        let mut out = Vec::new();
        assert_eq!(absorb_page(&ROOT, &ROOT, Vec::new(), &mut out), Page::Done);
        assert!(out.is_empty());
    }

    #[test]
    fn test_leaving_subtree_ends_walk() {
        let mut out = Vec::new();
        let page = absorb_page(
            &ROOT,
            &ROOT,
            vec![row(&[1, 3, 6, 9, 1], 10), row(&[1, 3, 6, 10, 1], 99)],
            &mut out,
        );
        assert_eq!(page, Page::Done);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_end_of_mib_view_ends_walk() {
        let mut out = Vec::new();
        let page = absorb_page(
            &ROOT,
            &ROOT,
            vec![row(&[1, 3, 6, 9, 1], 10), (vec![1, 3, 6, 9, 2], None)],
            &mut out,
        );
        assert_eq!(page, Page::Done);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_non_advancing_oid_ends_walk() {
        let current = [1, 3, 6, 9, 5];
        let mut out = Vec::new();
        // Тот же OID
        assert_eq!(
            absorb_page(&ROOT, &current, vec![row(&current, 1)], &mut out),
            Page::Done
        );
        // Меньший OID внутри поддерева
        assert_eq!(
            absorb_page(&ROOT, &current, vec![row(&[1, 3, 6, 9, 4], 1)], &mut out),
            Page::Done
        );
        // Откат внутри страницы
        assert_eq!(
            absorb_page(
                &ROOT,
                &current,
                vec![row(&[1, 3, 6, 9, 7], 1), row(&[1, 3, 6, 9, 6], 1)],
                &mut out
            ),
            Page::Done
        );
        assert_eq!(out.len(), 1);
    }

    /// Агент, который отвечает на первый запрос слишком поздно. Ответ
    /// остаётся в сокете и достаётся следующему запросу той же сессии.
    struct SlowAgent {
        pages: VecDeque<Vec<RawRow>>,
        slow_first: bool,
        stale_reply: bool,
        resets: usize,
    }

    #[async_trait]
    impl PageSource for SlowAgent {
        async fn fetch(&mut self, _from: &[u64]) -> Result<Vec<RawRow>> {
            if self.slow_first {
                self.slow_first = false;
                self.stale_reply = true;
                tokio::time::sleep(Duration::from_secs(10)).await;
            }
            if self.stale_reply {
                anyhow::bail!("request id mismatch");
            }
            Ok(self.pages.pop_front().unwrap_or_default())
        }

        async fn reset(&mut self) -> Result<()> {
            self.resets += 1;
            self.stale_reply = false;
            Ok(())
        }
    }

    fn options(retries: u32) -> SessionOptions {
        SessionOptions {
            timeout: Duration::from_millis(50),
            retries,
            max_repetitions: 50,
        }
    }

    #[tokio::test]
    async fn test_retry_after_timeout_uses_fresh_session() {
        let mut agent = SlowAgent {
            pages: VecDeque::from(vec![
                vec![row(&[1, 3, 6, 9, 1], 10), row(&[1, 3, 6, 9, 2], 20)],
                vec![row(&[1, 3, 6, 9, 3], 30), row(&[1, 3, 6, 10, 1], 0)],
            ]),
            slow_first: true,
            stale_reply: false,
            resets: 0,
        };

        let rows = walk_subtree(&mut agent, &ROOT, &options(2)).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].oid, "1.3.6.9.3");
        assert_eq!(agent.resets, 1);
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let mut agent = SlowAgent {
            pages: VecDeque::new(),
            slow_first: true,
            stale_reply: false,
            resets: 0,
        };

        assert!(walk_subtree(&mut agent, &ROOT, &options(0)).await.is_err());
        assert_eq!(agent.resets, 0);
    }
}
