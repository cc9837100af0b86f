//! # Temporal columns
//!
//! [`EpochColumn`] stores one epoch per row as Modified Julian Dates in a fixed
//! [`TimeScale`]. The [`TimeFormat`] only decides how the values are exposed by
//! [`EpochColumn::values`]; internally everything is MJD, which is also the numeric value used
//! when a temporal column serves as an index or sort key.
use hifitime::{Epoch, TimeScale};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{JD, JDTOMJD, MJD, SECONDS_PER_DAY, T2000},
    field::Sliceable,
    index::{retain_by_mask, MemberSelection},
    indexable_errors::IndexableError,
};

/// Transformation from modified julian date (MJD) in julian date (JD)
///
/// Argument
/// --------
/// * `mjd`: a slice of MJD
///
/// Return
/// ------
/// * a vector of JD
pub fn mjd_to_jd(mjd: &[MJD]) -> Vec<JD> {
    mjd.iter().map(|x| x + JDTOMJD).collect()
}

/// Transformation from julian date (JD) in modified julian date (MJD)
///
/// Argument
/// --------
/// * `jd`: a slice of JD
///
/// Return
/// ------
/// * a vector of MJD
pub fn jd_to_mjd(jd: &[JD]) -> Vec<MJD> {
    jd.iter().map(|x| x - JDTOMJD).collect()
}

/// MJD of `epoch` expressed in `scale`.
fn mjd_in_scale(epoch: &Epoch, scale: TimeScale) -> Result<MJD, IndexableError> {
    match scale {
        TimeScale::TAI => Ok(epoch.to_mjd_tai_days()),
        TimeScale::UTC => Ok(epoch.to_mjd_utc_days()),
        TimeScale::TT => Ok(epoch.to_mjd_tt_days()),
        TimeScale::TDB => Ok(epoch.to_jde_tdb_days() - JDTOMJD),
        TimeScale::ET => Ok(epoch.to_jde_et_days() - JDTOMJD),
        _ => Err(IndexableError::Consistency(format!(
            "time scale {scale:?} cannot be expressed in days"
        ))),
    }
}

/// Format used to expose the values of an [`EpochColumn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    #[default]
    Mjd,
    Jd,
}

/// A column of epochs sharing one time scale.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochColumn {
    mjd: Vec<MJD>,
    scale: TimeScale,
    format: TimeFormat,
}

impl EpochColumn {
    pub fn new(mjd: Vec<MJD>, scale: TimeScale) -> Self {
        EpochColumn {
            mjd,
            scale,
            format: TimeFormat::Mjd,
        }
    }

    /// Build a column from Julian Dates; the column is exposed in JD format.
    pub fn from_jd(jd: &[JD], scale: TimeScale) -> Self {
        EpochColumn {
            mjd: jd_to_mjd(jd),
            scale,
            format: TimeFormat::Jd,
        }
    }

    /// Build a column from `hifitime` epochs, expressed in `scale`.
    ///
    /// Errors
    /// ----------
    /// * [`IndexableError::Consistency`] if `scale` has no day-count conversion.
    pub fn from_epochs(epochs: &[Epoch], scale: TimeScale) -> Result<Self, IndexableError> {
        let mjd = epochs
            .iter()
            .map(|epoch| mjd_in_scale(epoch, scale))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EpochColumn::new(mjd, scale))
    }

    pub fn with_format(mut self, format: TimeFormat) -> Self {
        self.format = format;
        self
    }

    pub fn mjd(&self) -> &[MJD] {
        &self.mjd
    }

    pub fn jd(&self) -> Vec<JD> {
        mjd_to_jd(&self.mjd)
    }

    /// Values in the format of the column.
    pub fn values(&self) -> Vec<f64> {
        match self.format {
            TimeFormat::Mjd => self.mjd.clone(),
            TimeFormat::Jd => self.jd(),
        }
    }

    pub fn scale(&self) -> TimeScale {
        self.scale
    }

    pub fn format(&self) -> TimeFormat {
        self.format
    }

    /// Epoch of row `i`.
    pub fn epoch(&self, i: usize) -> Option<Epoch> {
        self.mjd
            .get(i)
            .map(|&mjd| Epoch::from_mjd_in_time_scale(mjd, self.scale))
    }

    pub fn epochs(&self) -> Vec<Epoch> {
        self.mjd
            .iter()
            .map(|&mjd| Epoch::from_mjd_in_time_scale(mjd, self.scale))
            .collect()
    }

    /// Copy of the column with every epoch re-expressed in `scale`.
    ///
    /// Errors
    /// ----------
    /// * [`IndexableError::Consistency`] if `scale` has no day-count conversion.
    pub fn to_scale(&self, scale: TimeScale) -> Result<Self, IndexableError> {
        if scale == self.scale {
            return Ok(self.clone());
        }

        let mjd = self
            .epochs()
            .iter()
            .map(|epoch| mjd_in_scale(epoch, scale))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(EpochColumn {
            mjd,
            scale,
            format: self.format,
        })
    }

    /// Seconds past J2000 in TDB, the epoch convention of ephemeris kernels.
    pub fn et_seconds(&self) -> Result<Vec<f64>, IndexableError> {
        let tdb = self.to_scale(TimeScale::TDB)?;
        Ok(tdb
            .mjd
            .iter()
            .map(|mjd| (mjd - T2000) * SECONDS_PER_DAY)
            .collect())
    }
}

impl Sliceable for EpochColumn {
    fn len(&self) -> usize {
        self.mjd.len()
    }

    fn take(&self, members: &MemberSelection) -> Self {
        EpochColumn {
            mjd: members.gather(&self.mjd),
            scale: self.scale,
            format: self.format,
        }
    }

    fn retain_rows(&mut self, keep: &[bool]) {
        retain_by_mask(&mut self.mjd, keep);
    }

    /// All parts must share the scale of the first one, whose format is kept.
    fn concat(parts: &[&Self]) -> Result<Self, IndexableError> {
        let Some(first) = parts.first() else {
            return Err(IndexableError::EmptyConcatenation);
        };

        if let Some(other) = parts.iter().find(|p| p.scale != first.scale) {
            return Err(IndexableError::Consistency(format!(
                "cannot concatenate epochs in {:?} with epochs in {:?}",
                first.scale, other.scale
            )));
        }

        Ok(EpochColumn {
            mjd: parts.iter().flat_map(|p| p.mjd.iter().copied()).collect(),
            scale: first.scale,
            format: first.format,
        })
    }
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_jd_mjd_conversion() {
        let jd = mjd_to_jd(&[0.0, 59000.5]);
        assert_eq!(jd, vec![2400000.5, 2459001.0]);
        assert_eq!(jd_to_mjd(&jd), vec![0.0, 59000.5]);
    }

    #[test]
    fn test_format_only_changes_exposed_values() {
        let column = EpochColumn::from_jd(&[2459000.5, 2459001.5], TimeScale::TDB);
        assert_eq!(column.format(), TimeFormat::Jd);
        assert_eq!(column.mjd(), &[59000.0, 59001.0]);
        assert_eq!(column.values(), vec![2459000.5, 2459001.5]);

        let column = column.with_format(TimeFormat::Mjd);
        assert_eq!(column.values(), vec![59000.0, 59001.0]);
    }

    #[test]
    fn test_epoch_round_trip() {
        let column = EpochColumn::new(vec![60000.25], TimeScale::TT);
        let epoch = column.epoch(0).unwrap();
        assert_relative_eq!(epoch.to_mjd_tt_days(), 60000.25, epsilon = 1e-9);
        assert!(column.epoch(1).is_none());

        let rebuilt = EpochColumn::from_epochs(&column.epochs(), TimeScale::TT)
            .unwrap();
        assert_relative_eq!(rebuilt.mjd()[0], 60000.25, epsilon = 1e-9);
    }

    #[test]
    fn test_to_scale() {
        let tai = EpochColumn::new(vec![60000.0], TimeScale::TAI);
        let tt = tai.to_scale(TimeScale::TT).unwrap();
        assert_eq!(tt.scale(), TimeScale::TT);
        // TT = TAI + 32.184 s
        assert_relative_eq!(
            (tt.mjd()[0] - 60000.0) * 86400.0,
            32.184,
            epsilon = 1e-4
        );
        assert_eq!(tai.to_scale(TimeScale::TAI).unwrap(), tai);
    }

    #[test]
    fn test_et_seconds() {
        let column = EpochColumn::new(vec![T2000, T2000 + 1.0], TimeScale::TDB);
        assert_eq!(column.et_seconds().unwrap(), vec![0.0, SECONDS_PER_DAY]);
    }

    #[test]
    fn test_row_operations_keep_scale() {
        let column = EpochColumn::new(vec![1.0, 2.0, 3.0], TimeScale::UTC);
        let taken = column.take(&MemberSelection::Positions(vec![2, 0]));
        assert_eq!(taken.mjd(), &[3.0, 1.0]);
        assert_eq!(taken.scale(), TimeScale::UTC);

        let mut retained = column.clone();
        retained.retain_rows(&[false, true, true]);
        assert_eq!(retained.mjd(), &[2.0, 3.0]);
    }

    #[test]
    fn test_concat_requires_same_scale() {
        let utc = EpochColumn::new(vec![1.0], TimeScale::UTC);
        let tdb = EpochColumn::new(vec![2.0], TimeScale::TDB);
        assert_eq!(
            EpochColumn::concat(&[&utc, &utc]).unwrap().mjd(),
            &[1.0, 1.0]
        );
        assert_eq!(
            EpochColumn::concat(&[&utc, &tdb]),
            Err(IndexableError::Consistency(
                "cannot concatenate epochs in UTC with epochs in TDB".into()
            ))
        );
    }
}
