//! End-to-end checks of the handle ownership protocol across both wrappers.

use twine_scip::{
    ForeignModel, Model, ModelError, Ownership, OwnershipError, ParamError, ParamKind, ParamValue,
    Side, native,
};

#[test]
fn handle_is_released_exactly_once_across_round_trip() {
    let model = Model::new();
    let id = model.handle_id();

    let foreign = model.export_foreign();
    let back = Model::import_foreign(&foreign).unwrap();
    let again = ForeignModel::import_model(&back).unwrap();

    assert!(!model.owns_handle());
    assert!(!foreign.free_on_drop());
    assert!(!back.owns_handle());
    assert!(again.free_on_drop());
    assert_eq!(model.ownership(), Ownership::OwnedBy(Side::Foreign));

    drop(model);
    drop(foreign);
    drop(back);
    assert!(native::is_live(id));
    assert_eq!(
        again.get_param("limits/nodes").unwrap(),
        ParamValue::LongInt(-1)
    );

    drop(again);
    assert!(!native::is_live(id));
}

#[test]
fn mutations_are_visible_from_every_wrapper() {
    let foreign = ForeignModel::new();
    let model = Model::import_foreign(&foreign).unwrap();
    let view = model.export_foreign();

    foreign.set_param("display/verblevel", 1).unwrap();
    assert_eq!(model.get_param("display/verblevel").unwrap(), ParamValue::Int(1));

    view.set_param("display/verblevel", 2).unwrap();
    assert_eq!(foreign.get_param("display/verblevel").unwrap(), ParamValue::Int(2));
}

#[test]
fn rejected_import_leaves_flags_unchanged() {
    let model = Model::new();
    let foreign = model.export_foreign();
    let owner = Model::import_foreign(&foreign).unwrap();

    let before = (model.owns_handle(), foreign.free_on_drop(), owner.owns_handle());
    let error = Model::import_foreign(&foreign).unwrap_err();
    let after = (model.owns_handle(), foreign.free_on_drop(), owner.owns_handle());

    assert!(matches!(
        error,
        ModelError::Ownership(OwnershipError::NotOwner {
            ownership: Ownership::OwnedBy(Side::Model),
            ..
        })
    ));
    assert_eq!(before, after);
    assert_eq!(before, (false, false, true));
}

#[test]
fn clone_survives_original() {
    let model = Model::new();
    model.set_param("concurrent/paramsetprefix", "x").unwrap();
    let copy = model.try_clone().unwrap();

    drop(model);

    assert_eq!(
        copy.get_param("concurrent/paramsetprefix").unwrap(),
        ParamValue::from("x")
    );
}

#[test]
fn clone_of_released_handle_fails() {
    let foreign = ForeignModel::new();
    let model = Model::import_foreign(&foreign).unwrap();
    let view = foreign.export_model();
    drop(model);

    let error = view.try_clone().unwrap_err();
    assert!(matches!(
        error,
        ModelError::Ownership(OwnershipError::Released { .. })
    ));
}

#[test]
fn parameter_errors_surface_through_foreign_wrapper() {
    let foreign = ForeignModel::new();

    let error = foreign.get_param("not_a_param").unwrap_err();
    assert_eq!(
        error,
        ModelError::Param(ParamError::NotFound {
            name: "not_a_param".to_string()
        })
    );

    let error = foreign
        .set_param("branching/preferbinary", "true")
        .unwrap_err();
    assert_eq!(
        error,
        ModelError::Param(ParamError::TypeMismatch {
            name: "branching/preferbinary".to_string(),
            expected: ParamKind::Bool,
            found: ParamKind::String,
        })
    );
}
