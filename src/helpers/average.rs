#[derive(Default, Clone, Copy)]
pub struct Average {
    sum: f64,
    count: usize,
}

impl Average {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
    }

    /// Mean of the pushed values, `None` when nothing has been pushed yet.
    #[must_use]
    pub fn average(&self) -> Option<f64> {
        (self.count != 0).then(|| self.sum / self.count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_ok() {
        let mut average = Average::default();
        average.push(4.0);
        average.push(5.0);
        average.push(3.0);
        assert_eq!(average.average(), Some(4.0));
    }

    #[test]
    fn empty_average_ok() {
        assert_eq!(Average::default().average(), None);
    }
}
