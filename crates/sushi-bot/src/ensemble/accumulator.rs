/// Running per-action value sums across completed samples.
///
/// Entries keep the order of the legal-action slice they were built from, so
/// selection ties resolve to the earliest legal action.
#[derive(Debug, Clone)]
pub struct ActionValueAccumulator<A> {
    entries: Vec<Entry<A>>,
}

#[derive(Debug, Clone)]
struct Entry<A> {
    action: A,
    sum: f64,
    count: u32,
}

impl<A> ActionValueAccumulator<A>
where
    A: Clone + PartialEq,
{
    /// One zeroed entry per legal action.
    pub fn new(legal: &[A]) -> Self {
        Self {
            entries: legal
                .iter()
                .map(|action| Entry {
                    action: action.clone(),
                    sum: 0.0,
                    count: 0,
                })
                .collect(),
        }
    }

    /// Adds one sample's value for `action`. Unknown actions are ignored.
    pub fn add(&mut self, action: &A, value: f64) -> bool {
        match self.entries.iter_mut().find(|entry| entry.action == *action) {
            Some(entry) => {
                entry.sum += value;
                entry.count += 1;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, action: &A) -> u32 {
        self.entries
            .iter()
            .find(|entry| entry.action == *action)
            .map_or(0, |entry| entry.count)
    }

    pub fn mean(&self, action: &A) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.action == *action)
            .and_then(Entry::mean)
    }

    /// `(action, mean)` pairs in legal order; `None` where nothing contributed.
    pub fn means(&self) -> Vec<(A, Option<f64>)> {
        self.entries
            .iter()
            .map(|entry| (entry.action.clone(), entry.mean()))
            .collect()
    }

    /// Action with the strictly greatest mean among entries that received at
    /// least one sample. NaN means never win. `None` when no entry qualifies.
    pub fn best(&self) -> Option<&A> {
        let mut best: Option<(&A, f64)> = None;
        for entry in &self.entries {
            let Some(mean) = entry.mean().filter(|mean| !mean.is_nan()) else {
                continue;
            };
            match best {
                Some((_, current)) if mean <= current => {}
                _ => best = Some((&entry.action, mean)),
            }
        }
        best.map(|(action, _)| action)
    }
}

impl<A> Entry<A> {
    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }
}
