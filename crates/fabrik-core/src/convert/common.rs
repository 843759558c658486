use super::{AttributeMapping, put_timestamp, timestamp};
use crate::attrs::AttributeBag;
use crate::error::CoreError;
use crate::model::{
    Account, ChangeLog, ChangeRecord, ErrorAdditionalInfo, Location, Notification, Operation,
    OperationError, Order, Package, Project, Redundancy,
};

impl AttributeMapping for Account {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            account_number: bag.int("account_number")?,
            account_name: bag.string("account_name")?,
            org_id: bag.int("org_id")?,
            organization_name: bag.string("organization_name")?,
            global_org_id: bag.string("global_org_id")?,
            global_organization_name: bag.string("global_organization_name")?,
            global_cust_id: bag.string("global_cust_id")?,
            ucm_id: bag.string("ucm_id")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("account_number", self.account_number)
            .put("account_name", self.account_name.as_ref())
            .put("org_id", self.org_id)
            .put("organization_name", self.organization_name.as_ref())
            .put("global_org_id", self.global_org_id.as_ref())
            .put("global_organization_name", self.global_organization_name.as_ref())
            .put("global_cust_id", self.global_cust_id.as_ref())
            .put("ucm_id", self.ucm_id.as_ref());
        bag
    }
}

impl AttributeMapping for Location {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            region: bag.string("region")?,
            metro_name: bag.string("metro_name")?,
            metro_code: bag.string("metro_code")?,
            ibx: bag.string("ibx")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("region", self.region.as_ref())
            .put("metro_name", self.metro_name.as_ref())
            .put("metro_code", self.metro_code.as_ref())
            .put("ibx", self.ibx.as_ref());
        bag
    }
}

impl AttributeMapping for Project {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            project_id: bag.string("project_id")?,
            href: bag.string("href")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("project_id", self.project_id.as_ref())
            .put("href", self.href.as_ref());
        bag
    }
}

impl AttributeMapping for Order {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            purchase_order_number: bag.string("purchase_order_number")?,
            billing_tier: bag.string("billing_tier")?,
            order_id: bag.string("order_id")?,
            order_number: bag.string("order_number")?,
            term_length: bag.int("term_length")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("purchase_order_number", self.purchase_order_number.as_ref())
            .put("billing_tier", self.billing_tier.as_ref())
            .put("order_id", self.order_id.as_ref())
            .put("order_number", self.order_number.as_ref())
            .put("term_length", self.term_length);
        bag
    }
}

impl AttributeMapping for Notification {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            notification_type: bag.string("type")?,
            send_interval: bag.string("send_interval")?,
            emails: bag.strings("emails")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("type", self.notification_type.as_ref())
            .put("send_interval", self.send_interval.as_ref())
            .put("emails", self.emails.as_ref());
        bag
    }
}

impl AttributeMapping for ChangeLog {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            created_by: bag.string("created_by")?,
            created_by_full_name: bag.string("created_by_full_name")?,
            created_by_email: bag.string("created_by_email")?,
            created_date_time: timestamp(bag, "created_date_time")?,
            updated_by: bag.string("updated_by")?,
            updated_by_full_name: bag.string("updated_by_full_name")?,
            updated_by_email: bag.string("updated_by_email")?,
            updated_date_time: timestamp(bag, "updated_date_time")?,
            deleted_by: bag.string("deleted_by")?,
            deleted_by_full_name: bag.string("deleted_by_full_name")?,
            deleted_by_email: bag.string("deleted_by_email")?,
            deleted_date_time: timestamp(bag, "deleted_date_time")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("created_by", self.created_by.as_ref())
            .put("created_by_full_name", self.created_by_full_name.as_ref())
            .put("created_by_email", self.created_by_email.as_ref());
        put_timestamp(&mut bag, "created_date_time", self.created_date_time.as_ref());
        bag.put("updated_by", self.updated_by.as_ref())
            .put("updated_by_full_name", self.updated_by_full_name.as_ref())
            .put("updated_by_email", self.updated_by_email.as_ref());
        put_timestamp(&mut bag, "updated_date_time", self.updated_date_time.as_ref());
        bag.put("deleted_by", self.deleted_by.as_ref())
            .put("deleted_by_full_name", self.deleted_by_full_name.as_ref())
            .put("deleted_by_email", self.deleted_by_email.as_ref());
        put_timestamp(&mut bag, "deleted_date_time", self.deleted_date_time.as_ref());
        bag
    }
}

impl AttributeMapping for Redundancy {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            group: bag.string("group")?,
            priority: bag.parsed("priority")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("group", self.group.as_ref())
            .put_display("priority", self.priority);
        bag
    }
}

impl AttributeMapping for ErrorAdditionalInfo {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            property: bag.string("property")?,
            reason: bag.string("reason")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("property", self.property.as_ref())
            .put("reason", self.reason.as_ref());
        bag
    }
}

impl AttributeMapping for OperationError {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            error_code: bag.string("error_code")?,
            error_message: bag.string("error_message")?,
            correlation_id: bag.string("correlation_id")?,
            details: bag.string("details")?,
            help: bag.string("help")?,
            additional_info: bag.mapped_list("additional_info")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("error_code", self.error_code.as_ref())
            .put("error_message", self.error_message.as_ref())
            .put("correlation_id", self.correlation_id.as_ref())
            .put("details", self.details.as_ref())
            .put("help", self.help.as_ref())
            .put_blocks("additional_info", self.additional_info.as_deref());
        bag
    }
}

impl AttributeMapping for Operation {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            provider_status: bag.string("provider_status")?,
            equinix_status: bag.string("equinix_status")?,
            operational_status: bag.string("operational_status")?,
            errors: bag.mapped_list("errors")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("provider_status", self.provider_status.as_ref())
            .put("equinix_status", self.equinix_status.as_ref())
            .put("operational_status", self.operational_status.as_ref())
            .put_blocks("errors", self.errors.as_deref());
        bag
    }
}

impl AttributeMapping for Package {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            code: bag.string("code")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("code", self.code.as_ref());
        bag
    }
}

impl AttributeMapping for ChangeRecord {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            uuid: bag.string("uuid")?,
            change_type: bag.string("type")?,
            status: bag.parsed("status")?,
            created_date_time: bag.string("created_date_time")?,
            updated_date_time: bag.string("updated_date_time")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("uuid", self.uuid.as_ref())
            .put("type", self.change_type.as_ref())
            .put_display("status", self.status)
            .put("created_date_time", self.created_date_time.as_ref())
            .put("updated_date_time", self.updated_date_time.as_ref());
        bag
    }
}
