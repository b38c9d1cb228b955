//! Hand-authored query payloads for the provider's internal GraphQL
//! endpoint. These mirror what the provider's own pages send; the field
//! sets are exactly what the gateway exposes, so schema drift upstream
//! shows up as missing fields rather than request failures.

use serde_json::json;

/// Pricing and tax history for one listing.
pub fn price_tax_query(zpid: &str) -> String {
    json!({
        "variables": { "zpid": zpid },
        "query": r#"query PriceTaxQuery($zpid: ID!) {
  property(zpid: $zpid) {
    zpid
    livingArea
    countyFIPS
    parcelId
    taxHistory {
      time
      taxPaid
      taxIncreaseRate
      value
      valueIncreaseRate
    }
    priceHistory {
      time
      price
      priceChangeRate
      event
      source
      buyerAgent {
        photo {
          url
        }
        profileUrl
        name
      }
      sellerAgent {
        photo {
          url
        }
        profileUrl
        name
      }
      postingIsRental
    }
    currency
  }
}"#
    })
    .to_string()
}

/// Full property render for one listing.
pub fn full_render_query(zpid: &str) -> String {
    json!({
        "variables": { "zpid": zpid },
        "query": r#"query ForSaleFullRenderQuery($zpid: ID!) {
  property(zpid: $zpid) {
    id
    zpid
    daysOnZillow
    dateSold
    datePosted
    lastSoldPrice
    isZillowOwned
    currency
    city
    postingUrl
    propertyTypeDimension
    hdpTypeDimension
    listingTypeDimension
    featuredListingTypeDimension
    brokerIdDimension
    keystoneHomeStatus
    rentalApplicationsAcceptedType
    yearBuilt
    boroughId
    brokerId
    brokerageName
    providerListingID
    postingProductType
    rentalRefreshTime
    isFeatured
    rentalDateAvailable
    newConstructionType
    comingSoonOnMarketDate
    listingStatusChangeDate
    isPreforeclosureAuction
    taxAssessedValue
    taxAssessedYear
    priceChange
    isNonOwnerOccupied
    isRecentStatusChange
    forecast
    homeStatus
    homeType
    country
    description
    isUndisclosedAddress
    isInstantOfferEnabled
    rentZestimate
    restimateHighPercent
    restimateLowPercent
    restimateMinus30
    state
    regionString
    streetAddress
    abbreviatedAddress
    lotSize
    zestimate
    zestimateHighPercent
    zestimateLowPercent
    zestimateMinus30
    zipcode
    price
    bedrooms
    bathrooms
    livingArea
    hoaFee
    propertyTaxRate
    latitude
    longitude
    foreclosureTypes {
      isBankOwned
      wasREO
      isForeclosedNFS
      isAnyForeclosure
      isPreforeclosure
      wasNonRetailAuction
      wasForeclosed
      wasDefault
    }
    homeFacts {
      aboveFactsAndFeaturesCategories {
        categoryName
        categoryFacts {
          factLabel
          factValue
        }
      }
      atAGlanceFacts {
        factLabel
        factValue
      }
      categoryDetails {
        categoryGroupName
        categories {
          categoryName
          categoryFacts {
            factLabel
            factValue
          }
        }
      }
    }
    smallPhotos: photos(size: S) {
      width
      height
      url
      caption
    }
    mediumPhotos: photos(size: M) {
      width
      height
      url
      caption
    }
    hugePhotos: photos(size: XXL) {
      width
      height
      url
      caption
    }
    photoCount
  }
}"#
    })
    .to_string()
}
