use tracing::debug;

use crate::image_pipeline::camera::types::{CameraModel, CameraRole};
use crate::image_pipeline::common::error::{FusionError, Result};

fn single_with_role(rig: &[CameraModel], role: CameraRole) -> Result<CameraModel> {
    let mut matches = rig.iter().filter(|m| m.role == role);
    match (matches.next(), matches.next()) {
        (Some(model), None) => Ok(model.clone()),
        (None, _) => Err(FusionError::Configuration(format!(
            "rig metadata has no {:?} camera",
            role
        ))),
        (Some(_), Some(_)) => Err(FusionError::Configuration(format!(
            "rig metadata has more than one {:?} camera",
            role
        ))),
    }
}

/// Picks the (primary, secondary) bottom-facing cameras from the rig.
pub fn select_bottom_pair(rig: &[CameraModel]) -> Result<(CameraModel, CameraModel)> {
    let primary = single_with_role(rig, CameraRole::Bottom)?;
    let secondary = single_with_role(rig, CameraRole::BottomSecondary)?;
    debug!(
        primary = %primary.camera_id,
        secondary = %secondary.camera_id,
        "Selected bottom camera pair"
    );
    Ok((primary, secondary))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> Vec<CameraModel> {
        vec![
            CameraModel::new("cam0", CameraRole::Side, 1000.0),
            CameraModel::new("cam_top", CameraRole::Top, 900.0),
            CameraModel::new("cam_bottom", CameraRole::Bottom, 800.0),
            CameraModel::new("cam_bottom2", CameraRole::BottomSecondary, 780.0).with_flip180(true),
        ]
    }

    #[test]
    fn picks_primary_and_secondary() {
        let (primary, secondary) = select_bottom_pair(&rig()).unwrap();
        assert_eq!(primary.camera_id, "cam_bottom");
        assert_eq!(secondary.camera_id, "cam_bottom2");
        assert!(secondary.flip180);
    }

    #[test]
    fn missing_secondary_is_configuration_error() {
        let rig: Vec<_> = rig()
            .into_iter()
            .filter(|m| m.role != CameraRole::BottomSecondary)
            .collect();
        let err = select_bottom_pair(&rig).unwrap_err();
        assert!(matches!(err, FusionError::Configuration(_)));
    }

    #[test]
    fn duplicate_primary_is_configuration_error() {
        let mut rig = rig();
        rig.push(CameraModel::new("cam_bottom_extra", CameraRole::Bottom, 800.0));
        assert!(matches!(
            select_bottom_pair(&rig),
            Err(FusionError::Configuration(_))
        ));
    }

    #[test]
    fn empty_rig_is_configuration_error() {
        assert!(matches!(
            select_bottom_pair(&[]),
            Err(FusionError::Configuration(_))
        ));
    }
}
